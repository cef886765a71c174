//! Doctor agenda: appointments split into upcoming, future and past.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::models::Appointment;

/// Horizon of the "upcoming" bucket
const UPCOMING_WINDOW_DAYS: i64 = 7;
/// `starting_soon` covers appointments due within this many minutes...
const SOON_AHEAD_MINUTES: i64 = 60;
/// ...or that started at most this many minutes ago
const SOON_BEHIND_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize)]
pub struct AgendaEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub minutes_until: i64,
    pub starting_soon: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Agenda {
    /// Within the next seven days, soonest first
    pub upcoming: Vec<AgendaEntry>,
    /// Beyond seven days, soonest first
    pub future: Vec<AgendaEntry>,
    /// Already started, most recent first
    pub past: Vec<AgendaEntry>,
    /// Appointments whose date or time could not be parsed
    pub unscheduled: Vec<Appointment>,
}

/// Combine an appointment's `YYYY-MM-DD` date and `HH:MM` time.
pub fn appointment_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .ok()?;
    Some(date.and_time(time))
}

pub fn build_agenda(appointments: Vec<Appointment>, now: NaiveDateTime) -> Agenda {
    let mut agenda = Agenda::default();
    let window = Duration::days(UPCOMING_WINDOW_DAYS);

    let mut dated: Vec<(NaiveDateTime, AgendaEntry)> = Vec::new();
    for appointment in appointments {
        let Some(start) = appointment_start(&appointment.date, &appointment.time) else {
            agenda.unscheduled.push(appointment);
            continue;
        };

        let minutes_until = (start - now).num_minutes();
        let entry = AgendaEntry {
            appointment,
            minutes_until,
            starting_soon: (-SOON_BEHIND_MINUTES..=SOON_AHEAD_MINUTES).contains(&minutes_until),
        };
        dated.push((start, entry));
    }

    dated.sort_by_key(|(start, _)| *start);
    for (start, entry) in dated {
        if start < now {
            agenda.past.push(entry);
        } else if start - now <= window {
            agenda.upcoming.push(entry);
        } else {
            agenda.future.push(entry);
        }
    }
    agenda.past.reverse();

    agenda
}
