//! Prescription models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Free-text medication list
    pub meds: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Prescription {
    pub fn new_id() -> String {
        format!("rx_{}", uuid::Uuid::new_v4().simple())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub meds: String,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl CreatePrescriptionRequest {
    pub fn into_prescription(self, id: String, now: DateTime<Utc>) -> Prescription {
        Prescription {
            id,
            date: self.date.unwrap_or(now),
            meds: self.meds.trim().to_string(),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub meds: Option<String>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdatePrescriptionRequest {
    pub fn apply_to(&self, prescription: &mut Prescription) {
        if let Some(ref meds) = self.meds {
            prescription.meds = meds.trim().to_string();
        }
        if let Some(ref notes) = self.notes {
            prescription.notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
        }
        if let Some(date) = self.date {
            prescription.date = date;
        }
    }
}
