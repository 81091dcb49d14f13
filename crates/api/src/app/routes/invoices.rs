use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use billing_core::InvoiceId;
use billing_invoicing::Invoice;

use crate::app::dto::{CreatedResponse, InvoiceRequest, ListInvoicesQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}

fn parse_id(raw: &str) -> Result<InvoiceId, ApiError> {
    InvoiceId::parse_v4(raw).map_err(|e| ApiError::InvalidId(e.to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| ApiError::InvalidBody(e.body_text()))
}

#[instrument(skip_all, fields(method = "create_invoice"))]
pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = body(payload)?;
    let invoice = draft.into_invoice(InvoiceId::new())?;
    let id = invoice.id;

    services.invoices.create(invoice).await?;

    tracing::info!(invoice_id = %id, "successfully finished");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_string() })))
}

#[instrument(skip_all, fields(method = "list_invoices"))]
pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<ListInvoicesQuery>, QueryRejection>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;

    let invoices = services
        .invoices
        .list(&query.filter(), query.page_request())
        .await?;

    tracing::info!(count = invoices.len(), "successfully finished");
    Ok(Json(invoices))
}

#[instrument(skip_all, fields(method = "get_invoice", invoice_id = %id))]
pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let id = parse_id(&id)?;
    let invoice = services.invoices.get(id).await?;

    tracing::info!("successfully finished");
    Ok(Json(invoice))
}

#[instrument(skip_all, fields(method = "update_invoice", invoice_id = %id))]
pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let draft = body(payload)?;
    let id = parse_id(&id)?;
    draft.validate()?;

    services.invoices.update(id, &draft).await?;

    tracing::info!("successfully finished");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(method = "delete_invoice", invoice_id = %id))]
pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    services.invoices.delete(id).await?;

    tracing::info!("successfully finished");
    Ok(StatusCode::NO_CONTENT)
}
