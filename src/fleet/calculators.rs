//! Core pricing calculation functions.
//!
//! Pure functions for rental pricing math - no I/O, no shared state.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::models::{FleetUnit, PriceTier};

/// Tiers starting at this many days carry a weekly rate instead of a tier total.
pub const WEEKLY_RATE_FROM_DAYS: u32 = 7;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use motorent_web::fleet::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// How a price was derived from the tier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Ranged tier starting at 7+ days: listed price is per week
    Weekly,
    /// Ranged tier under 7 days: listed price is the total for the range
    TierTotal,
    /// Default tier: listed price is per day
    Daily,
    /// No usable tier
    None,
}

/// Result of pricing one unit for a duration
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub total: Decimal,
    pub per_day: Decimal,
    pub basis: PriceBasis,
    /// Position of the tier used in the unit's tier list
    pub tier_index: Option<usize>,
}

/// Total price for renting `duration` days.
///
/// Overlapping ranged tiers resolve to the first one in list order.
pub fn price_for_duration(tiers: &[PriceTier], duration: u32) -> Decimal {
    quote_tiers(tiers, duration).total
}

/// Price a unit and report which rule produced the total.
pub fn quote(unit: &FleetUnit, duration: u32) -> PriceQuote {
    quote_tiers(&unit.price_tiers, duration)
}

fn quote_tiers(tiers: &[PriceTier], duration: u32) -> PriceQuote {
    let days = Decimal::from(duration);

    let ranged = tiers.iter().enumerate().find(|(_, tier)| tier.covers(duration));

    let (total, basis, tier_index) = match ranged {
        Some((
            index,
            PriceTier::Ranged {
                start_days, price, ..
            },
        )) => {
            if *start_days >= WEEKLY_RATE_FROM_DAYS {
                // multiply first so whole weeks stay exact
                let weekly = price
                    .checked_mul(days)
                    .and_then(|t| t.checked_div(Decimal::from(WEEKLY_RATE_FROM_DAYS)));
                (weekly, PriceBasis::Weekly, Some(index))
            } else {
                (Some(*price), PriceBasis::TierTotal, Some(index))
            }
        }
        _ => match tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| matches!(tier, PriceTier::Default { .. }))
        {
            Some((index, tier)) => (tier.price().checked_mul(days), PriceBasis::Daily, Some(index)),
            None => (Some(Decimal::ZERO), PriceBasis::None, None),
        },
    };

    let Some(total) = total else {
        warn!(
            "Price for {} days overflowed on tier #{:?}; pricing at zero",
            duration, tier_index
        );
        return PriceQuote {
            total: Decimal::ZERO,
            per_day: Decimal::ZERO,
            basis: PriceBasis::None,
            tier_index: None,
        };
    };

    let per_day = total.checked_div(days).unwrap_or(Decimal::ZERO);

    PriceQuote {
        total,
        per_day,
        basis,
        tier_index,
    }
}

/// Index pairs of ranged tiers whose day ranges overlap.
///
/// Overlaps are legal in the catalog (first match wins) but usually point at a
/// data-entry mistake, so the loader reports them.
pub fn overlapping_tiers(tiers: &[PriceTier]) -> Vec<(usize, usize)> {
    let ranges: Vec<(usize, u32, u32)> = tiers
        .iter()
        .enumerate()
        .filter_map(|(i, tier)| match tier {
            PriceTier::Ranged {
                start_days,
                end_days,
                ..
            } => Some((i, *start_days, end_days.unwrap_or(u32::MAX))),
            PriceTier::Default { .. } => None,
        })
        .collect();

    let mut overlaps = Vec::new();
    for (pos, (i, a_start, a_end)) in ranges.iter().enumerate() {
        for (j, b_start, b_end) in &ranges[pos + 1..] {
            if a_start <= b_end && b_start <= a_end {
                overlaps.push((*i, *j));
            }
        }
    }
    overlaps
}
