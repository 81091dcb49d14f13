//! Infrastructure layer: invoice persistence.
//!
//! The API talks to storage only through [`InvoiceStore`]. Two backends:
//! an in-memory store (default, dev/test) and a PostgreSQL store behind the
//! `postgres` feature.

pub mod invoice_store;

pub use invoice_store::{InMemoryInvoiceStore, InvoiceStore, RepositoryError};
#[cfg(feature = "postgres")]
pub use invoice_store::PostgresInvoiceStore;
