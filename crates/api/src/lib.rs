//! HTTP API: invoice CRUD and search over an [`billing_infra::InvoiceStore`].

pub mod app;
pub mod config;

pub use config::ApiConfig;
