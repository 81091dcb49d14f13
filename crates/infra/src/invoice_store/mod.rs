//! Invoice storage abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use billing_core::{DomainError, InvoiceId};
use billing_invoicing::{Invoice, InvoiceDraft, PageRequest, SearchFilter};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresInvoiceStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invoice not found")]
    NotFound,

    #[error("invoice {0} already exists")]
    Conflict(InvoiceId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl RepositoryError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Invoice persistence.
///
/// Listings are ordered by issue date, then id, so that paging is stable
/// across calls regardless of backend.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create(&self, invoice: Invoice) -> Result<(), RepositoryError>;

    async fn list(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Invoice>, RepositoryError>;

    async fn get(&self, id: InvoiceId) -> Result<Invoice, RepositoryError>;

    /// Apply `draft` to an existing invoice; the issue date is preserved.
    async fn update(&self, id: InvoiceId, draft: &InvoiceDraft) -> Result<Invoice, RepositoryError>;

    async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn create(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        (**self).create(invoice).await
    }

    async fn list(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        (**self).list(filter, page).await
    }

    async fn get(&self, id: InvoiceId) -> Result<Invoice, RepositoryError> {
        (**self).get(id).await
    }

    async fn update(&self, id: InvoiceId, draft: &InvoiceDraft) -> Result<Invoice, RepositoryError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError> {
        (**self).delete(id).await
    }
}
