use std::sync::Arc;

use billing_api::app::{self, AppServices};
use billing_core::InvoiceId;
use billing_infra::{InMemoryInvoiceStore, InvoiceStore, RepositoryError};
use billing_invoicing::{Invoice, InvoiceDraft, InvoiceStatus, PageRequest, SearchFilter, ServiceName};
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = app::build_app(services, "*");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn empty() -> Self {
        Self::spawn(AppServices::in_memory()).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seeded(service: ServiceName, amount: f64, day: u32) -> Invoice {
    InvoiceDraft {
        service_name: service,
        amount,
        status: InvoiceStatus::Pending,
        date: Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap(),
    }
    .into_invoice(InvoiceId::new())
    .unwrap()
}

fn create_body() -> serde_json::Value {
    json!({
        "serviceName": "DMP",
        "amount": 250.75,
        "status": "UNPAID",
        "date": "2024-01-05T00:00:00Z"
    })
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::empty().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn invoice_lifecycle_create_get_update_delete() {
    let srv = TestServer::empty().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/invoices"))
        .json(&create_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let res = client.get(srv.url(&format!("/invoices/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let invoice: serde_json::Value = res.json().await.unwrap();
    assert_eq!(invoice["id"], id.as_str());
    assert_eq!(invoice["serviceName"], "DMP");
    assert_eq!(invoice["amount"], 250.75);
    assert_eq!(invoice["status"], "UNPAID");
    assert_eq!(invoice["date"], "2024-01-05T00:00:00Z");

    let res = client
        .put(srv.url(&format!("/invoices/{id}")))
        .json(&json!({
            "serviceName": "SSP",
            "amount": 300,
            "status": "PAID",
            "date": "2030-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let updated: Invoice = client
        .get(srv.url(&format!("/invoices/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.service_name, ServiceName::Ssp);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.amount, 300.0);
    assert_eq!(updated.date, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());

    let res = client.delete(srv.url(&format!("/invoices/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url(&format!("/invoices/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn list_supports_search_and_paging() {
    let dmp_a = seeded(ServiceName::Dmp, 10.0, 1);
    let ssp = seeded(ServiceName::Ssp, 20.0, 2);
    let dmp_b = seeded(ServiceName::Dmp, 30.0, 3);
    let store = InMemoryInvoiceStore::with_invoices([dmp_a.clone(), ssp.clone(), dmp_b.clone()]);
    let srv = TestServer::spawn(AppServices::new(Arc::new(store))).await;
    let client = reqwest::Client::new();

    let all: Vec<Invoice> = client.get(srv.url("/invoices")).send().await.unwrap().json().await.unwrap();
    assert_eq!(all, vec![dmp_a.clone(), ssp.clone(), dmp_b.clone()]);

    let found: Vec<Invoice> = client
        .get(srv.url("/invoices"))
        .query(&[("search", "ssp")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found, vec![ssp.clone()]);

    // An empty search term is the same as no search.
    let blank: Vec<Invoice> = client
        .get(srv.url("/invoices?search="))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(blank.len(), 3);

    let page: Vec<Invoice> = client
        .get(srv.url("/invoices?page=2&pageSize=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page, vec![dmp_b]);
}

#[tokio::test]
async fn invalid_input_is_rejected_with_400() {
    let srv = TestServer::empty().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/invoices/not-a-uuid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .delete(srv.url("/invoices/6fa459ea-ee8a-11ca-8a0d-0800200c9a66"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut bad_service = create_body();
    bad_service["serviceName"] = json!("CDN");
    let res = client.post(srv.url("/invoices")).json(&bad_service).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let mut low_amount = create_body();
    low_amount["amount"] = json!(0.5);
    let res = client.post(srv.url("/invoices")).json(&low_amount).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(srv.url("/invoices?page=first")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_query");
}

#[tokio::test]
async fn updating_or_deleting_unknown_invoice_is_404() {
    let srv = TestServer::empty().await;
    let client = reqwest::Client::new();
    let id = InvoiceId::new();

    let res = client
        .put(srv.url(&format!("/invoices/{id}")))
        .json(&create_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(srv.url(&format!("/invoices/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = app::build_app(AppServices::in_memory(), "http://localhost:3000");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let res = reqwest::Client::new()
        .get(format!("http://{addr}/invoices"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );

    handle.abort();
}

/// Store whose listing blows up, standing in for a handler bug.
struct PanickingStore;

#[async_trait::async_trait]
impl InvoiceStore for PanickingStore {
    async fn create(&self, _invoice: Invoice) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list(&self, _filter: &SearchFilter, _page: PageRequest) -> Result<Vec<Invoice>, RepositoryError> {
        panic!("invoice listing exploded");
    }

    async fn get(&self, _id: InvoiceId) -> Result<Invoice, RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    async fn update(&self, _id: InvoiceId, _draft: &InvoiceDraft) -> Result<Invoice, RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    async fn delete(&self, _id: InvoiceId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

#[tokio::test]
async fn handler_panic_becomes_500() {
    let srv = TestServer::spawn(AppServices::new(Arc::new(PanickingStore))).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/invoices")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "internal error");

    // The server keeps serving after the panic.
    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
