//! Domain models for the rental fleet.
//!
//! These are the already-normalized shapes the engine works on. Parsing of the
//! loose catalog payloads into these types lives in `catalog.rs`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weekday index for Saturday (0 = Sunday .. 6 = Saturday)
pub const SATURDAY: u32 = 6;

/// A pricing rule for a range of rental days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceTier {
    /// Applies when `start_days <= duration <= end_days`.
    /// `end_days == None` means the range is open-ended.
    Ranged {
        start_days: u32,
        end_days: Option<u32>,
        price: Decimal,
    },
    /// Fallback daily rate used when no ranged tier matches.
    Default {
        price: Decimal,
    },
}

impl PriceTier {
    /// Check if a ranged tier covers the given duration. Default tiers never match here.
    pub fn covers(&self, duration: u32) -> bool {
        match self {
            PriceTier::Ranged {
                start_days,
                end_days,
                ..
            } => *start_days <= duration && end_days.map_or(true, |end| duration <= end),
            PriceTier::Default { .. } => false,
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            PriceTier::Ranged { price, .. } | PriceTier::Default { price } => *price,
        }
    }
}

/// Sparse booking flags keyed by `YYYY/MM/DD`, `YYYY/MM/DD_start` or `YYYY/MM/DD_end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingMap(HashMap<String, bool>);

impl BookingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the raw feed object, keeping only truthy flags.
    pub fn from_json(raw: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            raw.iter()
                .filter(|(_, v)| is_truthy(v))
                .map(|(k, _)| (k.clone(), true))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any of the day, `_start` or `_end` keys for `date` is set.
    pub fn is_booked(&self, date: NaiveDate) -> bool {
        let key = date_key(date);
        [
            key.clone(),
            format!("{}_start", key),
            format!("{}_end", key),
        ]
        .iter()
        .any(|k| self.0.get(k).copied().unwrap_or(false))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for BookingMap {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Format a date as the booking feed key (`YYYY/MM/DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Loose truthiness of a feed value
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// One rentable variant of the fleet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetUnit {
    pub identifier: String,
    pub display_name: String,
    pub price_tiers: Vec<PriceTier>,
    /// `None` until the booking feed for this unit has arrived
    pub bookings: Option<BookingMap>,
    pub loading: bool,
}

impl FleetUnit {
    /// New unit from the catalog, waiting on booking data
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        price_tiers: Vec<PriceTier>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            price_tiers,
            bookings: None,
            loading: true,
        }
    }

    /// Copy of this unit with booking data merged in and loading cleared.
    pub fn with_bookings(&self, bookings: BookingMap) -> Self {
        Self {
            bookings: Some(bookings),
            loading: false,
            ..self.clone()
        }
    }
}

/// Shop-wide closures applied to every unit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClosureRules {
    /// Weekday indices, 0 = Sunday .. 6 = Saturday
    #[serde(default = "default_weekly_closure_days")]
    pub weekly_closure_days: BTreeSet<u32>,
    /// year -> month (1-based) -> days of month
    #[serde(default)]
    pub holiday_overrides: BTreeMap<i32, BTreeMap<u32, BTreeSet<u32>>>,
}

fn default_weekly_closure_days() -> BTreeSet<u32> {
    BTreeSet::from([0])
}

impl Default for ClosureRules {
    fn default() -> Self {
        Self {
            weekly_closure_days: default_weekly_closure_days(),
            holiday_overrides: BTreeMap::new(),
        }
    }
}

impl ClosureRules {
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        if self
            .weekly_closure_days
            .contains(&date.weekday().num_days_from_sunday())
        {
            return true;
        }
        self.holiday_overrides
            .get(&date.year())
            .and_then(|months| months.get(&date.month()))
            .map_or(false, |days| days.contains(&date.day()))
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holiday_overrides
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_default()
            .insert(date.day());
    }
}

/// Per-date classification of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStatus {
    Pending,
    Booked,
    Closed,
    Half,
    Available,
}

impl DateStatus {
    /// Statuses that count as free when filtering by selected dates
    pub fn is_rentable(&self) -> bool {
        matches!(self, DateStatus::Available | DateStatus::Half)
    }
}
