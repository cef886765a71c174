//! Patient dashboard: doctor catalog, own appointments and medical records.
//!
//! A patient's appointments are the ones whose `patient_id` is their email.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, Doctor, DoctorCard, MedicalRecord, Profile,
    RescheduleRequest, TimeSlot,
};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_required;

fn not_found() -> ApiError {
    ApiError::not_found("Appointment not found")
}

/// An open slot of `doctor`, or a validation error naming `slotId`.
fn open_slot(doctor: &Doctor, slot_id: &str) -> Result<TimeSlot, ApiError> {
    match doctor.slot(slot_id) {
        Some(slot) if slot.available => Ok(slot.clone()),
        Some(_) => Err(ApiError::validation_field("slotId", "This time slot is no longer available")),
        None => Err(ApiError::validation_field("slotId", "Please choose one of the doctor's time slots")),
    }
}

async fn own_appointment(state: &AppState, profile: &Profile, id: &str) -> Result<Appointment, ApiError> {
    state
        .clinic
        .appointments
        .get(&id.to_string())
        .await
        .filter(|a| a.patient_id == profile.email)
        .ok_or_else(not_found)
}

/// GET /api/patient/doctors
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Json<Vec<DoctorCard>> {
    let doctors = state.clinic.doctors.list().await;
    Json(doctors.iter().map(DoctorCard::from).collect())
}

/// Own appointments, soonest first
///
/// GET /api/patient/appointments
pub async fn list_appointments(State(state): State<Arc<AppState>>, profile: Profile) -> Json<Vec<Appointment>> {
    let mut appointments = state
        .clinic
        .appointments
        .filter(|a| a.patient_id == profile.email)
        .await;
    appointments.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
    Json(appointments)
}

/// Book one of a doctor's open slots
///
/// POST /api/patient/appointments
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    profile: Profile,
    Json(req): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    validate_required(&req.reason, "Reason for visit").map_err(|e| ApiError::validation_field("reason", e))?;

    let doctor = state
        .clinic
        .doctors
        .get(&req.doctor_id)
        .await
        .ok_or_else(|| ApiError::not_found("Doctor not found"))?;
    let slot = open_slot(&doctor, &req.slot_id)?;

    let appointment = Appointment {
        id: Appointment::new_id(),
        patient_id: profile.email.clone(),
        patient_name: profile.full_name.clone(),
        doctor_id: doctor.id.to_string(),
        doctor_name: doctor.display_name(),
        doctor_specialty: Some(doctor.speciality.clone()),
        date: slot.date,
        time: slot.start_time,
        status: AppointmentStatus::Scheduled,
        reason: req.reason.trim().to_string(),
        notes: req.notes.filter(|n| !n.trim().is_empty()),
    };
    let appointment = state.clinic.appointments.insert(appointment).await?;

    tracing::info!(
        id = %appointment.id,
        patient = %profile.email,
        doctor_id = doctor.id,
        date = %appointment.date,
        time = %appointment.time,
        "Appointment booked"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Move to another slot of the same doctor and/or change reason and notes
///
/// PUT /api/patient/appointments/:id
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    profile: Profile,
    Path(id): Path<String>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<Appointment>, ApiError> {
    if let Some(ref reason) = req.reason {
        validate_required(reason, "Reason for visit").map_err(|e| ApiError::validation_field("reason", e))?;
    }

    let current = own_appointment(&state, &profile, &id).await?;

    let slot = match req.slot_id {
        Some(ref slot_id) => {
            let doctor = match current.doctor_id.parse::<i64>() {
                Ok(doctor_id) => state.clinic.doctors.get(&doctor_id).await,
                Err(_) => None,
            }
            .ok_or_else(|| ApiError::not_found("Doctor not found"))?;
            Some(open_slot(&doctor, slot_id)?)
        }
        None => None,
    };

    let email = profile.email.clone();
    let appointment = state
        .clinic
        .appointments
        .try_update(&id, |a| {
            if a.patient_id != email {
                return Err(not_found());
            }
            if let Some(slot) = slot {
                a.date = slot.date;
                a.time = slot.start_time;
            }
            if let Some(ref reason) = req.reason {
                a.reason = reason.trim().to_string();
            }
            if req.notes.is_some() {
                a.notes = req.notes.clone().filter(|n| !n.trim().is_empty());
            }
            Ok(())
        })
        .await?;

    tracing::info!(id = %id, patient = %profile.email, "Appointment rescheduled");
    Ok(Json(appointment))
}

/// POST /api/patient/appointments/:id/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    profile: Profile,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state
        .clinic
        .appointments
        .try_update(&id, |a| {
            if a.patient_id != profile.email {
                return Err(not_found());
            }
            a.status = AppointmentStatus::Cancelled;
            Ok(())
        })
        .await?;

    tracing::info!(id = %id, patient = %profile.email, "Appointment cancelled");
    Ok(Json(appointment))
}

/// DELETE /api/patient/appointments/:id
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    profile: Profile,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    own_appointment(&state, &profile, &id).await?;
    state.clinic.appointments.remove(&id).await?;

    tracing::info!(id = %id, patient = %profile.email, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/patient/records
pub async fn medical_records(State(state): State<Arc<AppState>>) -> Json<Vec<MedicalRecord>> {
    Json(state.clinic.records.clone())
}
