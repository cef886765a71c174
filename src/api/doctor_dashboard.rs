//! Doctor dashboard: agenda, patient directory and prescriptions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::clinic::{build_agenda, Agenda};
use crate::models::{
    CreatePrescriptionRequest, Patient, PatientHistory, PatientSummary, Prescription, Profile, SearchQuery,
    UpdatePrescriptionRequest,
};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_required;

#[derive(Debug, Default, Deserialize)]
pub struct AgendaQuery {
    pub doctor_id: Option<String>,
}

async fn find_patient(state: &AppState, id: i64) -> Result<Patient, ApiError> {
    state
        .clinic
        .patients
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Patient not found"))
}

/// GET /api/doctor/agenda?doctor_id=
pub async fn agenda(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgendaQuery>,
) -> Json<Agenda> {
    let appointments = match query.doctor_id {
        Some(ref doctor_id) => state.clinic.appointments.filter(|a| &a.doctor_id == doctor_id).await,
        None => state.clinic.appointments.list().await,
    };
    Json(build_agenda(appointments, Utc::now().naive_utc()))
}

/// Search by name or id
///
/// GET /api/doctor/patients?q=
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<PatientSummary>> {
    let patients = state
        .clinic
        .patients
        .filter(|p| query.matches(&[&p.full_name(), &p.id.to_string()]))
        .await;
    Json(patients.iter().map(PatientSummary::from).collect())
}

/// GET /api/doctor/patients/:id
pub async fn patient_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PatientHistory>, ApiError> {
    let patient = find_patient(&state, id).await?;
    Ok(Json(PatientHistory::from(&patient)))
}

/// Newest first
///
/// GET /api/doctor/patients/:id/prescriptions
pub async fn list_prescriptions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    find_patient(&state, id).await?;
    Ok(Json(state.clinic.prescriptions.list(&id.to_string()).await))
}

/// POST /api/doctor/patients/:id/prescriptions
pub async fn create_prescription(
    State(state): State<Arc<AppState>>,
    profile: Profile,
    Path(id): Path<i64>,
    Json(req): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    validate_required(&req.meds, "Medications").map_err(|e| ApiError::validation_field("meds", e))?;
    find_patient(&state, id).await?;

    let prescription = state.clinic.prescriptions.create(&id.to_string(), req).await?;
    tracing::info!(patient_id = id, id = %prescription.id, doctor = %profile.email, "Prescription written");
    Ok((StatusCode::CREATED, Json(prescription)))
}

/// PUT /api/doctor/patients/:id/prescriptions/:rx_id
pub async fn update_prescription(
    State(state): State<Arc<AppState>>,
    Path((id, rx_id)): Path<(i64, String)>,
    Json(req): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Prescription>, ApiError> {
    if let Some(ref meds) = req.meds {
        validate_required(meds, "Medications").map_err(|e| ApiError::validation_field("meds", e))?;
    }

    let prescription = state
        .clinic
        .prescriptions
        .update(&id.to_string(), &rx_id, &req)
        .await?;
    Ok(Json(prescription))
}

/// DELETE /api/doctor/patients/:id/prescriptions/:rx_id
pub async fn delete_prescription(
    State(state): State<Arc<AppState>>,
    Path((id, rx_id)): Path<(i64, String)>,
) -> Result<StatusCode, ApiError> {
    state.clinic.prescriptions.delete(&id.to_string(), &rx_id).await?;
    tracing::info!(patient_id = id, id = %rx_id, "Prescription deleted");
    Ok(StatusCode::NO_CONTENT)
}
