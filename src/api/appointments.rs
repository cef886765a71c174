//! Admin appointment management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{Appointment, AppointmentQuery, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_date, validate_time};

const MISSING_FIELDS: &str = "Please fill patient, doctor and date/time.";

fn validate_create_request(req: &CreateAppointmentRequest) -> Result<(), ApiError> {
    let required = [&req.patient_name, &req.doctor_name, &req.date, &req.time];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(ApiError::validation_field("appointment", MISSING_FIELDS));
    }

    let mut errors = ValidationErrorBuilder::new();
    errors.check("date", validate_date(&req.date));
    errors.check("time", validate_time(&req.time));
    errors.finish()
}

fn validate_update_request(req: &UpdateAppointmentRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    for (field, value) in [("patientName", &req.patient_name), ("doctorName", &req.doctor_name)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            errors.add(field, MISSING_FIELDS);
        }
    }
    if let Some(ref date) = req.date {
        errors.check("date", validate_date(date));
    }
    if let Some(ref time) = req.time {
        errors.check("time", validate_time(time));
    }

    errors.finish()
}

/// GET /api/admin/appointments?q=&status=&doctor_id=
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentQuery>,
) -> Json<Vec<Appointment>> {
    let appointments = state.clinic.appointments.filter(|a| a.matches(&query)).await;
    Json(appointments)
}

/// GET /api/admin/appointments/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    state
        .clinic
        .appointments
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Appointment not found"))
}

/// POST /api/admin/appointments
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    validate_create_request(&req)?;

    let appointment = req.into_appointment(Appointment::new_id());
    let appointment = state.clinic.appointments.insert(appointment).await?;

    tracing::info!(id = %appointment.id, patient = %appointment.patient_name, "Appointment created");
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Edit an appointment; only submitted fields change
///
/// PUT /api/admin/appointments/:id
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    validate_update_request(&req)?;

    let appointment = state.clinic.appointments.update(&id, |a| req.apply_to(a)).await?;
    Ok(Json(appointment))
}

/// DELETE /api/admin/appointments/:id
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.clinic.appointments.remove(&id).await?;
    tracing::info!(id = %id, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}
