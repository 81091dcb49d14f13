//! Invoicing domain module.
//!
//! The invoice record exchanged between the API and the dashboard, plus the
//! pure rules around it: draft validation, search matching and paging.
//! No IO, no HTTP, no storage.

pub mod invoice;
pub mod paging;
pub mod search;

pub use invoice::{Invoice, InvoiceDraft, InvoiceStatus, ServiceName, MIN_AMOUNT};
pub use paging::PageRequest;
pub use search::SearchFilter;
