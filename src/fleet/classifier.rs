//! Per-date availability classification.
//!
//! Precedence is fixed: pending, then booked, then closed, then half day,
//! then available.

use chrono::{Datelike, NaiveDate};

use super::models::{ClosureRules, DateStatus, FleetUnit, SATURDAY};

/// Classify a single date for a unit.
pub fn classify(unit: &FleetUnit, rules: &ClosureRules, date: NaiveDate) -> DateStatus {
    let bookings = match (&unit.bookings, unit.loading) {
        (Some(bookings), false) => bookings,
        _ => return DateStatus::Pending,
    };

    if bookings.is_booked(date) {
        return DateStatus::Booked;
    }

    if rules.is_closed(date) {
        return DateStatus::Closed;
    }

    if date.weekday().num_days_from_sunday() == SATURDAY {
        return DateStatus::Half;
    }

    DateStatus::Available
}

/// Classify `days` consecutive dates starting at `from`.
pub fn calendar(
    unit: &FleetUnit,
    rules: &ClosureRules,
    from: NaiveDate,
    days: u32,
) -> Vec<(NaiveDate, DateStatus)> {
    from.iter_days()
        .take(days as usize)
        .map(|date| (date, classify(unit, rules, date)))
        .collect()
}

/// True if the unit is free on at least one of the dates.
pub fn is_free_on_any(unit: &FleetUnit, rules: &ClosureRules, dates: &[NaiveDate]) -> bool {
    dates
        .iter()
        .any(|date| classify(unit, rules, *date).is_rentable())
}
