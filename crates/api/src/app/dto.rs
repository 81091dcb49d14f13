use serde::Deserialize;

use billing_invoicing::{InvoiceDraft, PageRequest, SearchFilter};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /invoices` and `PUT /invoices/:id`.
pub type InvoiceRequest = InvoiceDraft;

/// Query of `GET /invoices`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

impl ListInvoicesQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn filter(&self) -> SearchFilter {
        SearchFilter::parse(self.search.as_deref())
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, serde::Serialize)]
pub struct CreatedResponse {
    pub id: String,
}
