//! `billing-core` — domain building blocks shared by the API and the dashboard.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns)
//! and must stay compilable for `wasm32-unknown-unknown`.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::InvoiceId;
