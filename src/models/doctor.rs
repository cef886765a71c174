//! Doctor models and DTOs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::common::patch;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Recurring weekly working hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub day: String,
    pub from: String,
    pub to: String,
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self {
            day: "Mon".to_string(),
            from: "09:00".to_string(),
            to: "17:00".to_string(),
        }
    }
}

/// Concrete bookable slot on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub availability: Vec<WeeklyHours>,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }

    pub fn slot(&self, slot_id: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    /// Available slots grouped by date, dates ascending.
    pub fn open_slots_by_date(&self) -> BTreeMap<String, Vec<TimeSlot>> {
        let mut grouped: BTreeMap<String, Vec<TimeSlot>> = BTreeMap::new();
        for slot in self.slots.iter().filter(|s| s.available) {
            grouped.entry(slot.date.clone()).or_default().push(slot.clone());
        }
        for slots in grouped.values_mut() {
            slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        }
        grouped
    }
}

/// Doctor card shown in the patient catalog
#[derive(Debug, Clone, Serialize)]
pub struct DoctorCard {
    pub id: i64,
    pub name: String,
    pub speciality: String,
    pub department: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<u32>,
    pub rating: Option<f32>,
    pub open_slots: BTreeMap<String, Vec<TimeSlot>>,
}

impl From<&Doctor> for DoctorCard {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.display_name(),
            speciality: doctor.speciality.clone(),
            department: doctor.department.clone(),
            education: doctor.education.clone(),
            experience_years: doctor.experience_years,
            rating: doctor.rating,
            open_slots: doctor.open_slots_by_date(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
    pub department: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub availability: Vec<WeeklyHours>,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

impl CreateDoctorRequest {
    pub fn into_doctor(self, id: i64) -> Doctor {
        let availability = if self.availability.is_empty() {
            vec![WeeklyHours::default()]
        } else {
            self.availability
        };

        Doctor {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            speciality: self.speciality.trim().to_string(),
            department: self.department,
            education: self.education,
            experience_years: self.experience_years,
            rating: None,
            availability,
            slots: self.slots,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub speciality: Option<String>,
    pub department: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<u32>,
    pub availability: Option<Vec<WeeklyHours>>,
    pub slots: Option<Vec<TimeSlot>>,
}

impl UpdateDoctorRequest {
    pub fn apply_to(&self, doctor: &mut Doctor) {
        patch(&mut doctor.first_name, &self.first_name);
        patch(&mut doctor.last_name, &self.last_name);
        patch(&mut doctor.speciality, &self.speciality);
        if self.department.is_some() {
            doctor.department = self.department.clone();
        }
        if self.education.is_some() {
            doctor.education = self.education.clone();
        }
        if self.experience_years.is_some() {
            doctor.experience_years = self.experience_years;
        }
        patch(&mut doctor.availability, &self.availability);
        patch(&mut doctor.slots, &self.slots);
    }
}
