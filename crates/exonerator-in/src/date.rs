//! Date validation for the `timestamp` parameter.

use chrono::NaiveDate;
use exonerator_core::{last_available_date, ValidatedDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Validate a raw `timestamp` parameter against today's UTC date.
///
/// The date must be a real calendar date written as `YYYY-MM-DD`.
/// Dates after `today - 2 days` are valid but flagged as too recent.
pub fn validate(raw: Option<&str>, today: NaiveDate) -> ValidatedDate {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return ValidatedDate::Empty,
    };

    match parse_date(raw.trim()) {
        Some(date) => ValidatedDate::Valid {
            date,
            raw: raw.to_string(),
            too_recent: date > last_available_date(today),
        },
        None => ValidatedDate::Invalid {
            raw: raw.to_string(),
        },
    }
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}
