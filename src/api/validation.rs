//! Input validation for API requests.
//!
//! Each `validate_*` function returns `Err(message)` for the first problem
//! found. To report several fields at once, feed the results into
//! `ValidationErrorBuilder::check` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{LineItem, WeeklyHours, WEEKDAYS};

lazy_static! {
    /// Something@something.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();

    /// Calendar date, `YYYY-MM-DD`
    static ref DATE_REGEX: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}$"
    ).unwrap();

    /// 24-hour clock time, `HH:MM`
    static ref TIME_REGEX: Regex = Regex::new(
        r"^([01]\d|2[0-3]):[0-5]\d$"
    ).unwrap();
}

/// Reject empty or whitespace-only values
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a `YYYY-MM-DD` date that exists on the calendar
pub fn validate_date(date: &str) -> Result<(), String> {
    if !DATE_REGEX.is_match(date) || chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err("Date must be a valid YYYY-MM-DD date".to_string());
    }
    Ok(())
}

/// Validate an `HH:MM` time
pub fn validate_time(time: &str) -> Result<(), String> {
    if !TIME_REGEX.is_match(time) {
        return Err("Time must be HH:MM (24-hour)".to_string());
    }
    Ok(())
}

/// Validate weekly availability rows: known day, valid times, from < to
pub fn validate_weekly_hours(rows: &[WeeklyHours]) -> Result<(), String> {
    for row in rows {
        if !WEEKDAYS.contains(&row.day.as_str()) {
            return Err(format!(
                "Invalid day '{}'. Must be one of: {}",
                row.day,
                WEEKDAYS.join(", ")
            ));
        }
        validate_time(&row.from)?;
        validate_time(&row.to)?;

        // HH:MM compares correctly as text
        if row.from >= row.to {
            return Err(format!("{}: start time must be before end time", row.day));
        }
    }
    Ok(())
}

/// Validate invoice line items: a description and a positive quantity each
pub fn validate_line_items(items: &[LineItem]) -> Result<(), String> {
    let mut total: u64 = 0;
    for item in items {
        if item.description.trim().is_empty() {
            return Err("Every line item needs a description".to_string());
        }
        if item.qty == 0 {
            return Err(format!("Quantity for '{}' must be at least 1", item.description));
        }
        total = item
            .checked_amount()
            .and_then(|amount| total.checked_add(amount))
            .ok_or_else(|| format!("Amount for '{}' is too large", item.description))?;
    }
    Ok(())
}
