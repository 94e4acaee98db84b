//! Query DTOs for fleet API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, Result};

use super::filter::SortDirective;

/// Upper bound for a calendar window
pub const MAX_CALENDAR_DAYS: u32 = 366;

/// Upper bound for a rental duration
pub const MAX_RENTAL_DAYS: u32 = 366;

/// Query for the fleet listing
#[derive(Debug, Default, Deserialize)]
pub struct FleetListQuery {
    /// Comma-separated dates, `YYYY-MM-DD` or `YYYY/MM/DD`
    #[serde(default)]
    pub dates: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    /// Parsed by `resolve_duration` so bad values get the JSON error body
    #[serde(default)]
    pub duration: Option<String>,
}

impl FleetListQuery {
    pub fn selected_dates(&self) -> Result<Vec<NaiveDate>> {
        match self.dates.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_date)
                .collect(),
        }
    }

    pub fn sort_directive(&self) -> Result<SortDirective> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortDirective::default()),
            Some(raw) => raw.parse::<SortDirective>().map_err(AppError::BadRequest),
        }
    }
}

/// Query for a single unit's price quote
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    #[serde(default)]
    pub duration: Option<String>,
}

/// Query for a unit's calendar
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default = "default_calendar_days")]
    pub days: u32,
}

fn default_calendar_days() -> u32 {
    30
}

impl CalendarQuery {
    pub fn start_date(&self, today: NaiveDate) -> Result<NaiveDate> {
        match self.from.as_deref() {
            None | Some("") => Ok(today),
            Some(raw) => parse_date(raw),
        }
    }

    pub fn day_count(&self) -> Result<u32> {
        if self.days == 0 || self.days > MAX_CALENDAR_DAYS {
            return Err(AppError::BadRequest(format!(
                "days must be between 1 and {}",
                MAX_CALENDAR_DAYS
            )));
        }
        Ok(self.days)
    }
}

/// Resolve the rental duration, accepting 1 to `MAX_RENTAL_DAYS` days.
pub fn resolve_duration(requested: Option<&str>, default_duration: u32) -> Result<u32> {
    let duration = match requested.map(str::trim) {
        None | Some("") => default_duration,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| AppError::BadRequest(format!("invalid duration '{}'", raw)))?,
    };
    if !(1..=MAX_RENTAL_DAYS).contains(&duration) {
        return Err(AppError::BadRequest(format!(
            "duration must be between 1 and {} days",
            MAX_RENTAL_DAYS
        )));
    }
    Ok(duration)
}

/// Parse `YYYY-MM-DD` or `YYYY/MM/DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .map_err(|_| AppError::BadRequest(format!("invalid date '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        assert_eq!(parse_date("2026-02-07").unwrap(), expected);
        assert_eq!(parse_date("2026/02/07").unwrap(), expected);
        assert!(parse_date("07.02.2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }

    #[test]
    fn test_selected_dates() {
        let query = FleetListQuery {
            dates: Some("2026-02-07, 2026/02/08,".to_string()),
            ..Default::default()
        };
        assert_eq!(query.selected_dates().unwrap().len(), 2);

        assert!(FleetListQuery::default().selected_dates().unwrap().is_empty());

        let bad = FleetListQuery {
            dates: Some("tomorrow".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.selected_dates(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_sort_directive_default_and_invalid() {
        assert_eq!(
            FleetListQuery::default().sort_directive().unwrap(),
            SortDirective::PriceAscending
        );
        let bad = FleetListQuery {
            sort: Some("random".to_string()),
            ..Default::default()
        };
        assert!(bad.sort_directive().is_err());
    }

    #[test]
    fn test_resolve_duration() {
        assert_eq!(resolve_duration(None, 3).unwrap(), 3);
        assert_eq!(resolve_duration(Some(""), 3).unwrap(), 3);
        assert_eq!(resolve_duration(Some("10"), 3).unwrap(), 10);
        assert_eq!(resolve_duration(Some("366"), 3).unwrap(), MAX_RENTAL_DAYS);
        assert!(resolve_duration(Some("0"), 3).is_err());
        assert!(resolve_duration(Some("367"), 3).is_err());
        assert!(resolve_duration(Some("4000000000"), 3).is_err());
        assert!(matches!(
            resolve_duration(Some("abc"), 3),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_calendar_day_count_bounds() {
        let query = CalendarQuery {
            from: None,
            days: 0,
        };
        assert!(query.day_count().is_err());
        let query = CalendarQuery {
            from: None,
            days: 31,
        };
        assert_eq!(query.day_count().unwrap(), 31);
    }
}
