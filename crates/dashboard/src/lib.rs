//! `billing-dashboard`
//!
//! **Responsibility:** the billing dashboard UI.
//!
//! The behaviour lives in plain modules that build and test on any target:
//! - [`nav`]: sidebar destinations and active-route matching
//! - [`list_view`]: invoice list view state (rows, loading, terminal error)
//! - [`table`]: column sorting and cell formatting
//! - [`client`]: HTTP client for the invoice API
//!
//! The Leptos frontend (`frontend`, wasm32 only) is a thin view over them.

pub mod client;
pub mod config;
pub mod list_view;
pub mod nav;
pub mod table;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use client::{ApiClient, ClientError, InvoiceQuery};
pub use config::DashboardConfig;
pub use list_view::{InvoiceListState, ListBody};
