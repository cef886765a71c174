//! Patient models and DTOs.

use serde::{Deserialize, Serialize};

use super::common::patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Inactive,
}

impl Default for PatientStatus {
    fn default() -> Self {
        PatientStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub date: String,
    pub reason: String,
    #[serde(default)]
    pub initial: bool,
    #[serde(default)]
    pub last_doctor: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: PatientStatus,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Most recent visit date (ISO dates compare lexically).
    pub fn last_visit(&self) -> Option<&str> {
        self.visits.iter().map(|v| v.date.as_str()).max()
    }
}

/// Patient card in the doctor's directory
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub last_visit: Option<String>,
    pub report_count: usize,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.full_name(),
            age: patient.age,
            gender: patient.gender.clone(),
            last_visit: patient.last_visit().map(str::to_string),
            report_count: patient.reports.len(),
        }
    }
}

/// Full history as shown to a doctor
#[derive(Debug, Clone, Serialize)]
pub struct PatientHistory {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub summary: String,
    pub last_visit: Option<String>,
    pub visits: Vec<Visit>,
    pub reports: Vec<Report>,
}

impl From<&Patient> for PatientHistory {
    fn from(patient: &Patient) -> Self {
        let mut visits = patient.visits.clone();
        visits.sort_by(|a, b| b.date.cmp(&a.date));
        let mut reports = patient.reports.clone();
        reports.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            id: patient.id,
            name: patient.full_name(),
            age: patient.age,
            gender: patient.gender.clone(),
            summary: patient.summary.clone(),
            last_visit: patient.last_visit().map(str::to_string),
            visits,
            reports,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: PatientStatus,
    #[serde(default)]
    pub summary: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl CreatePatientRequest {
    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            status: self.status,
            summary: self.summary,
            age: self.age,
            gender: self.gender,
            visits: self.visits,
            reports: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<PatientStatus>,
    pub summary: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub visits: Option<Vec<Visit>>,
}

impl UpdatePatientRequest {
    pub fn apply_to(&self, patient: &mut Patient) {
        patch(&mut patient.first_name, &self.first_name);
        patch(&mut patient.last_name, &self.last_name);
        if let Some(ref email) = self.email {
            patient.email = email.trim().to_lowercase();
        }
        if let Some(ref phone) = self.phone {
            patient.phone = Some(phone.clone()).filter(|p| !p.trim().is_empty());
        }
        patch(&mut patient.status, &self.status);
        patch(&mut patient.summary, &self.summary);
        if self.age.is_some() {
            patient.age = self.age;
        }
        if self.gender.is_some() {
            patient.gender = self.gender.clone();
        }
        patch(&mut patient.visits, &self.visits);
    }
}

/// Read-only medical record shown on the patient dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: String,
    pub date: String,
    pub doctor: String,
    pub diagnosis: String,
    pub treatment: String,
    pub prescriptions: Vec<String>,
}
