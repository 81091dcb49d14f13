use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use billing_core::InvoiceId;
use billing_invoicing::{Invoice, InvoiceDraft, PageRequest, SearchFilter};

use super::{InvoiceStore, RepositoryError};

/// In-memory invoice store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `invoices` (later duplicates win).
    pub fn with_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Self {
        let map = invoices.into_iter().map(|i| (i.id, i)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(operation: &'static str) -> RepositoryError {
    RepositoryError::backend(operation, "invoice store lock poisoned")
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn create(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned("create"))?;
        if map.contains_key(&invoice.id) {
            return Err(RepositoryError::Conflict(invoice.id));
        }
        map.insert(invoice.id, invoice);
        Ok(())
    }

    async fn list(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned("list"))?;
        let mut matching: Vec<Invoice> = map
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(page.window(matching))
    }

    async fn get(&self, id: InvoiceId) -> Result<Invoice, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned("get"))?;
        map.get(&id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: InvoiceId, draft: &InvoiceDraft) -> Result<Invoice, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned("update"))?;
        let invoice = map.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        invoice.apply_update(draft)?;
        Ok(invoice.clone())
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned("delete"))?;
        map.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
