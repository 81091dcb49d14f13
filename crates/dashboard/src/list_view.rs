//! State behind the invoice list page.
//!
//! The page starts a fetch on mount and one per search submission. Every
//! completed fetch replaces the rows wholesale, so the last one to finish
//! wins. A failure is terminal: once set, the error banner stays up and the
//! table is not rendered again for the lifetime of the view.

use billing_invoicing::Invoice;

use crate::client::ClientError;

#[derive(Debug, Clone, Default)]
pub struct InvoiceListState {
    invoices: Vec<Invoice>,
    in_flight: usize,
    error: Option<String>,
}

/// What the page body should show.
#[derive(Debug, PartialEq)]
pub enum ListBody<'a> {
    Failed(&'a str),
    Table { rows: &'a [Invoice], loading: bool },
}

impl InvoiceListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    pub fn finish_fetch(&mut self, result: Result<Vec<Invoice>, ClientError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(invoices) => self.invoices = invoices,
            Err(err) => {
                tracing::warn!(error = %err, "invoice fetch failed");
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn body(&self) -> ListBody<'_> {
        match &self.error {
            Some(message) => ListBody::Failed(message),
            None => ListBody::Table {
                rows: &self.invoices,
                loading: self.is_loading(),
            },
        }
    }
}
