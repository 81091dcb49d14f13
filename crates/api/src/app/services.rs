use std::sync::Arc;

use billing_infra::{InMemoryInvoiceStore, InvoiceStore, RepositoryError};

use crate::config::ApiConfig;

/// Shared handler state.
#[derive(Clone)]
pub struct AppServices {
    pub invoices: Arc<dyn InvoiceStore>,
}

impl AppServices {
    pub fn new(invoices: Arc<dyn InvoiceStore>) -> Self {
        Self { invoices }
    }

    /// Services over an empty in-memory store (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInvoiceStore::new()))
    }
}

/// Pick the invoice store from configuration.
///
/// A configured database is used only when the `postgres` feature is
/// compiled in; otherwise the in-memory store is used and a warning logged.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, RepositoryError> {
    match config.database_url() {
        Some(url) => connect_database(&url).await,
        None => {
            tracing::info!("no database configured; using in-memory invoice store");
            Ok(AppServices::in_memory())
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect_database(url: &str) -> Result<AppServices, RepositoryError> {
    let store = billing_infra::PostgresInvoiceStore::connect(url).await?;
    tracing::info!("connected to postgres invoice store");
    Ok(AppServices::new(Arc::new(store)))
}

#[cfg(not(feature = "postgres"))]
async fn connect_database(_url: &str) -> Result<AppServices, RepositoryError> {
    tracing::warn!("database configured but built without the `postgres` feature; using in-memory invoice store");
    Ok(AppServices::in_memory())
}
