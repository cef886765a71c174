//! Admin dashboard figures.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Appointment, AppointmentStatus, Invoice};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub appointments: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub invoices: usize,
    pub paid: usize,
    pub collected: u64,
    pub outstanding: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    pub patients: usize,
    pub doctors: usize,
    pub appointments: usize,
    pub prescriptions: usize,
    pub status: StatusCounts,
    pub appointments_per_day: Vec<DailyCount>,
    pub billing: BillingSummary,
    pub currency: String,
}

pub fn status_counts(appointments: &[Appointment]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Scheduled => counts.scheduled += 1,
            AppointmentStatus::Completed => counts.completed += 1,
            AppointmentStatus::Cancelled => counts.cancelled += 1,
        }
    }
    counts
}

/// Appointments per calendar date, dates ascending.
pub fn appointments_per_day(appointments: &[Appointment]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<&str, usize> = BTreeMap::new();
    for appointment in appointments {
        *per_day.entry(appointment.date.as_str()).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(date, appointments)| DailyCount {
            date: date.to_string(),
            appointments,
        })
        .collect()
}

pub fn billing_summary(invoices: &[Invoice]) -> BillingSummary {
    invoices.iter().fold(BillingSummary::default(), |mut acc, invoice| {
        acc.invoices += 1;
        if invoice.paid {
            acc.paid += 1;
            acc.collected = acc.collected.saturating_add(invoice.total());
        } else {
            acc.outstanding = acc.outstanding.saturating_add(invoice.total());
        }
        acc
    })
}
