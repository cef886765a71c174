//! Admin doctor management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{CreateDoctorRequest, Doctor, SearchQuery, UpdateDoctorRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_required, validate_weekly_hours};

fn validate_create_request(req: &CreateDoctorRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("first_name", validate_required(&req.first_name, "First name"));
    errors.check("last_name", validate_required(&req.last_name, "Last name"));
    errors.check("speciality", validate_required(&req.speciality, "Speciality"));
    errors.check("availability", validate_weekly_hours(&req.availability));
    errors.finish()
}

fn validate_update_request(req: &UpdateDoctorRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref first_name) = req.first_name {
        errors.check("first_name", validate_required(first_name, "First name"));
    }
    if let Some(ref last_name) = req.last_name {
        errors.check("last_name", validate_required(last_name, "Last name"));
    }
    if let Some(ref speciality) = req.speciality {
        errors.check("speciality", validate_required(speciality, "Speciality"));
    }
    if let Some(ref availability) = req.availability {
        errors.check("availability", validate_weekly_hours(availability));
    }

    errors.finish()
}

/// GET /api/admin/doctors?q=
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Doctor>> {
    let doctors = state
        .clinic
        .doctors
        .filter(|d| query.matches(&[&d.display_name(), &d.speciality, &d.id.to_string()]))
        .await;
    Json(doctors)
}

/// GET /api/admin/doctors/:id
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, ApiError> {
    state
        .clinic
        .doctors
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Doctor not found"))
}

/// POST /api/admin/doctors
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    validate_create_request(&req)?;

    let doctor = state
        .clinic
        .doctors
        .insert_with_next_id(|id| req.into_doctor(id))
        .await?;

    tracing::info!(id = doctor.id, name = %doctor.display_name(), "Doctor added");
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// PUT /api/admin/doctors/:id
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, ApiError> {
    validate_update_request(&req)?;

    let doctor = state.clinic.doctors.update(&id, |d| req.apply_to(d)).await?;
    Ok(Json(doctor))
}

/// DELETE /api/admin/doctors/:id
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.clinic.doctors.remove(&id).await?;
    tracing::info!(id = id, "Doctor removed");
    Ok(StatusCode::NO_CONTENT)
}
