//! Response DTOs for fleet API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cache::CacheStats;

use super::calculators::{round_money, PriceBasis, PriceQuote};
use super::filter::SortDirective;
use super::models::DateStatus;
use super::snapshot::FleetSnapshot;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    /// Rounded to cents and padded to two places for display
    pub fn rounded(amount: Decimal, currency: &str) -> Self {
        let mut amount = round_money(amount, 2);
        amount.rescale(2);
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Status of one unit on one date
#[derive(Debug, Clone, Serialize)]
pub struct DateStatusResponse {
    pub date: NaiveDate,
    pub status: DateStatus,
}

/// One row of the fleet table
#[derive(Debug, Clone, Serialize)]
pub struct FleetRowResponse {
    pub identifier: String,
    pub display_name: String,
    pub price: MoneyResponse,
    pub loading: bool,
    /// Status per selected date, in selection order
    pub statuses: Vec<DateStatusResponse>,
}

/// Response for the fleet listing
#[derive(Debug, Serialize)]
pub struct FleetListResponse {
    pub snapshot_version: u64,
    pub duration: u32,
    pub sort: SortDirective,
    pub units: Vec<FleetRowResponse>,
}

/// Response for a single price quote
#[derive(Debug, Serialize)]
pub struct PriceQuoteResponse {
    pub identifier: String,
    pub duration: u32,
    pub total: MoneyResponse,
    pub per_day: MoneyResponse,
    pub basis: PriceBasis,
    pub tier_index: Option<usize>,
}

impl PriceQuoteResponse {
    pub fn from_quote(identifier: &str, duration: u32, quote: PriceQuote, currency: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            duration,
            total: MoneyResponse::rounded(quote.total, currency),
            per_day: MoneyResponse::rounded(quote.per_day, currency),
            basis: quote.basis,
            tier_index: quote.tier_index,
        }
    }
}

/// Response for a unit calendar
#[derive(Debug, Clone, Serialize)]
pub struct CalendarResponse {
    pub identifier: String,
    pub snapshot_version: u64,
    pub days: Vec<DateStatusResponse>,
}

/// Response after merging booking data or reloading the catalog
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_version: u64,
    pub unit_count: usize,
    pub pending_count: usize,
}

impl SnapshotResponse {
    pub fn from_snapshot(snapshot: &FleetSnapshot) -> Self {
        Self {
            snapshot_version: snapshot.version,
            unit_count: snapshot.units.len(),
            pending_count: snapshot.pending_count(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub snapshot: SnapshotResponse,
    pub cache: CacheStats,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}
