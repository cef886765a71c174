//! Admin patient management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{CreatePatientRequest, Patient, SearchQuery, UpdatePatientRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_required};

fn validate_create_request(req: &CreatePatientRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("first_name", validate_required(&req.first_name, "First name"));
    errors.check("last_name", validate_required(&req.last_name, "Last name"));
    errors.check("email", validate_email(req.email.trim()));
    errors.finish()
}

fn validate_update_request(req: &UpdatePatientRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref first_name) = req.first_name {
        errors.check("first_name", validate_required(first_name, "First name"));
    }
    if let Some(ref last_name) = req.last_name {
        errors.check("last_name", validate_required(last_name, "Last name"));
    }
    if let Some(ref email) = req.email {
        errors.check("email", validate_email(email.trim()));
    }

    errors.finish()
}

/// GET /api/admin/patients?q=
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Patient>> {
    let patients = state
        .clinic
        .patients
        .filter(|p| query.matches(&[&p.full_name(), &p.email, &p.id.to_string()]))
        .await;
    Json(patients)
}

/// GET /api/admin/patients/:id
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    state
        .clinic
        .patients
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Patient not found"))
}

/// POST /api/admin/patients
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    validate_create_request(&req)?;

    let patient = state
        .clinic
        .patients
        .insert_with_next_id(|id| req.into_patient(id))
        .await?;

    tracing::info!(id = patient.id, name = %patient.full_name(), "Patient added");
    Ok((StatusCode::CREATED, Json(patient)))
}

/// PUT /api/admin/patients/:id
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    validate_update_request(&req)?;

    let patient = state.clinic.patients.update(&id, |p| req.apply_to(p)).await?;
    Ok(Json(patient))
}

/// DELETE /api/admin/patients/:id
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.clinic.patients.remove(&id).await?;
    tracing::info!(id = id, "Patient removed");
    Ok(StatusCode::NO_CONTENT)
}
