//! HTTP client for the invoice API.
//!
//! Works on native targets and in the browser (reqwest uses `fetch` on
//! wasm32). Requests carry no timeout and are never cancelled.

use reqwest::Url;
use thiserror::Error;

use billing_invoicing::Invoice;

use crate::config::DashboardConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid API url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("API responded with status {0}")]
    Status(u16),
    #[error("failed to parse invoices: {0}")]
    Parse(String),
}

/// Which invoices to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceQuery {
    /// `GET /invoices`
    All,
    /// `GET /invoices?search=<term>`; the term is sent even when empty.
    Search(String),
}

impl InvoiceQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self::Search(term.into())
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.api_url())
    }

    /// Full request URL for `query`, with the search term form-encoded.
    pub fn request_url(&self, query: &InvoiceQuery) -> Result<Url, ClientError> {
        let raw = format!("{}/invoices", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        if let InvoiceQuery::Search(term) = query {
            url.query_pairs_mut().append_pair("search", term);
        }
        Ok(url)
    }

    /// Fetch invoices; the whole response replaces whatever the caller held.
    pub async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, ClientError> {
        let url = self.request_url(query)?;
        tracing::debug!(%url, "fetching invoices");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
