//! Admin billing: invoices with line items.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::models::{
    CreateInvoiceRequest, InvoiceResponse, MarkPaidRequest, SearchQuery, UpdateInvoiceRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_date, validate_line_items, validate_required};

fn validate_create_request(req: &CreateInvoiceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("patient_name", validate_required(&req.patient_name, "Patient name"));
    errors.check("items", validate_line_items(&req.items));
    if let Some(date) = req.date.as_deref().filter(|d| !d.trim().is_empty()) {
        errors.check("date", validate_date(date));
    }
    errors.finish()
}

fn validate_update_request(req: &UpdateInvoiceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref patient_name) = req.patient_name {
        errors.check("patient_name", validate_required(patient_name, "Patient name"));
    }
    if let Some(ref invoice_no) = req.invoice_no {
        errors.check("invoice_no", validate_required(invoice_no, "Invoice number"));
    }
    if let Some(ref date) = req.date {
        errors.check("date", validate_date(date));
    }
    if let Some(ref items) = req.items {
        errors.check("items", validate_line_items(items));
    }

    errors.finish()
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// GET /api/admin/invoices?q=
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<InvoiceResponse>> {
    let currency = &state.config.billing.currency;
    let invoices = state
        .clinic
        .invoices
        .filter(|i| i.matches(query.q.as_deref()))
        .await
        .into_iter()
        .map(|invoice| InvoiceResponse::new(invoice, currency))
        .collect();
    Json(invoices)
}

/// GET /api/admin/invoices/:id
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state
        .clinic
        .invoices
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Invoice not found"))?;
    Ok(Json(InvoiceResponse::new(invoice, &state.config.billing.currency)))
}

/// Create an invoice; the number and date are generated when omitted
///
/// POST /api/admin/invoices
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    validate_create_request(&req)?;

    let req = req.with_defaults(&today());
    let invoice = state
        .clinic
        .invoices
        .insert_with_next_id(|id| req.into_invoice(id))
        .await?;

    tracing::info!(id = invoice.id, invoice_no = %invoice.invoice_no, total = invoice.total(), "Invoice created");
    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse::new(invoice, &state.config.billing.currency)),
    ))
}

/// PUT /api/admin/invoices/:id
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    validate_update_request(&req)?;

    let invoice = state.clinic.invoices.update(&id, |i| req.apply_to(i)).await?;
    Ok(Json(InvoiceResponse::new(invoice, &state.config.billing.currency)))
}

/// PUT /api/admin/invoices/:id/paid
pub async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<MarkPaidRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state.clinic.invoices.update(&id, |i| i.paid = req.paid).await?;
    tracing::info!(id = id, paid = req.paid, "Invoice payment status changed");
    Ok(Json(InvoiceResponse::new(invoice, &state.config.billing.currency)))
}

/// DELETE /api/admin/invoices/:id
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.clinic.invoices.remove(&id).await?;
    tracing::info!(id = id, "Invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}
