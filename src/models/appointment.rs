//! Appointment models and DTOs.

use serde::{Deserialize, Serialize};

use super::common::{matches_query, patch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

/// Appointment as stored under `patient_appointments` (camelCase on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_specialty: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new_id() -> String {
        format!("apt_{}", uuid::Uuid::new_v4().simple())
    }

    pub fn matches(&self, query: &AppointmentQuery) -> bool {
        if let Some(status) = query.status {
            if self.status != status {
                return false;
            }
        }
        if let Some(ref doctor_id) = query.doctor_id {
            if &self.doctor_id != doctor_id {
                return false;
            }
        }
        matches_query(
            query.q.as_deref(),
            &[&self.patient_name, &self.doctor_name, &self.id],
        )
    }
}

/// Filters for appointment listings
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub q: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<String>,
}

/// Admin form for creating an appointment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: String,
    pub doctor_specialty: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub reason: String,
    pub notes: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id.trim().to_string(),
            patient_name: self.patient_name.trim().to_string(),
            doctor_id: self.doctor_id.trim().to_string(),
            doctor_name: self.doctor_name.trim().to_string(),
            doctor_specialty: self.doctor_specialty,
            date: self.date,
            time: self.time,
            status: self.status.unwrap_or(AppointmentStatus::Scheduled),
            reason: self.reason,
            notes: self.notes,
        }
    }
}

/// Partial edit: only submitted fields change, the id never does.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn apply_to(&self, appointment: &mut Appointment) {
        patch(&mut appointment.patient_id, &self.patient_id);
        patch(&mut appointment.patient_name, &self.patient_name);
        patch(&mut appointment.doctor_id, &self.doctor_id);
        patch(&mut appointment.doctor_name, &self.doctor_name);
        if self.doctor_specialty.is_some() {
            appointment.doctor_specialty = self.doctor_specialty.clone();
        }
        patch(&mut appointment.date, &self.date);
        patch(&mut appointment.time, &self.time);
        patch(&mut appointment.status, &self.status);
        patch(&mut appointment.reason, &self.reason);
        if self.notes.is_some() {
            appointment.notes = self.notes.clone();
        }
    }
}

/// Patient booking form: a doctor plus one of that doctor's slots
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    pub slot_id: String,
    #[serde(default)]
    pub reason: String,
    pub notes: Option<String>,
}

/// Patient reschedule form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub slot_id: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        Appointment {
            id: "a1".to_string(),
            patient_id: "john@example.com".to_string(),
            patient_name: "John Doe".to_string(),
            doctor_id: "1".to_string(),
            doctor_name: "Dr. Sara Khan".to_string(),
            doctor_specialty: Some("Cardiologist".to_string()),
            date: "2025-10-22".to_string(),
            time: "10:00".to_string(),
            status: AppointmentStatus::Scheduled,
            reason: "Checkup".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Scheduled".parse(), Ok(AppointmentStatus::Scheduled));
        assert_eq!("canceled".parse(), Ok(AppointmentStatus::Cancelled));
        assert!("pending".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_update_touches_only_submitted_fields() {
        let mut appt = sample();
        let update = UpdateAppointmentRequest {
            time: Some("11:30".to_string()),
            notes: Some("Bring reports".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut appt);

        let mut expected = sample();
        expected.time = "11:30".to_string();
        expected.notes = Some("Bring reports".to_string());
        assert_eq!(appt, expected);
    }

    #[test]
    fn test_matches_filters() {
        let appt = sample();
        assert!(appt.matches(&AppointmentQuery::default()));
        assert!(appt.matches(&AppointmentQuery {
            q: Some("sara".to_string()),
            ..Default::default()
        }));
        assert!(!appt.matches(&AppointmentQuery {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        }));
        assert!(!appt.matches(&AppointmentQuery {
            doctor_id: Some("2".to_string()),
            ..Default::default()
        }));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["patientId"], "john@example.com");
        assert_eq!(json["doctorSpecialty"], "Cardiologist");
        assert_eq!(json["status"], "scheduled");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_edit_form_uses_record_keys() {
        let req: UpdateAppointmentRequest = serde_json::from_value(serde_json::json!({
            "patientName": "John A. Doe",
            "doctorId": "3",
            "doctorSpecialty": "Pediatrics"
        }))
        .unwrap();

        let mut appt = sample();
        req.apply_to(&mut appt);
        let json = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["patientName"], "John A. Doe");
        assert_eq!(json["doctorId"], "3");
        assert_eq!(json["doctorSpecialty"], "Pediatrics");
        assert_eq!(json["id"], "a1");

        let book: BookAppointmentRequest =
            serde_json::from_value(serde_json::json!({ "doctorId": 2, "slotId": "4" })).unwrap();
        assert_eq!(book.doctor_id, 2);
        assert_eq!(book.slot_id, "4");
        assert!(book.reason.is_empty());
    }
}
