//! Catalog and closure-rule loading.
//!
//! The catalog feed is loosely typed: ids may be numbers, prices may be
//! numbers or strings, and tier bounds use the string `"default"` as a
//! sentinel. Everything is normalized here so the engine only sees
//! `FleetUnit` and `PriceTier`. Malformed tiers are skipped, never fatal.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};

use super::calculators::overlapping_tiers;
use super::models::{ClosureRules, FleetUnit, PriceTier};
use super::snapshot::FleetSnapshot;

const DEFAULT_SENTINEL: &str = "default";

/// A tier bound as it appears in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayBound {
    Days(u32),
    Default,
}

/// Parse the catalog document into fleet units (in feed order, duplicates kept).
///
/// Accepts either a bare array of products or `{"products": [...]}`.
pub fn parse_catalog(raw: &Value) -> Result<Vec<FleetUnit>> {
    let products = raw
        .as_array()
        .or_else(|| raw.get("products").and_then(|p| p.as_array()))
        .ok_or_else(|| {
            AppError::Catalog("expected an array of products or a 'products' array".to_string())
        })?;

    let units = products
        .iter()
        .enumerate()
        .filter_map(|(position, product)| {
            let unit = parse_product(product);
            if unit.is_none() {
                warn!("Skipping catalog product #{} without an id", position);
            }
            unit
        })
        .collect();

    Ok(units)
}

fn parse_product(raw: &Value) -> Option<FleetUnit> {
    let identifier = match raw.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let display_name = raw
        .get("name")
        .or_else(|| raw.get("display_name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| identifier.clone());

    let price_tiers = raw
        .get("price_tiers")
        .map(|tiers| parse_price_tiers(&identifier, tiers))
        .unwrap_or_default();

    for (a, b) in overlapping_tiers(&price_tiers) {
        debug!(
            "Unit {} has overlapping price tiers #{} and #{}; the first one wins",
            identifier, a, b
        );
    }

    Some(FleetUnit::new(identifier, display_name, price_tiers))
}

/// Parse a tier list, dropping entries that cannot be understood.
pub fn parse_price_tiers(unit_id: &str, raw: &Value) -> Vec<PriceTier> {
    let Some(entries) = raw.as_array() else {
        warn!("Unit {} has malformed price_tiers; pricing it at zero", unit_id);
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let tier = parse_tier(entry);
            if tier.is_none() {
                warn!("Unit {} has a malformed price tier: {}", unit_id, entry);
            }
            tier
        })
        .collect()
}

fn parse_tier(raw: &Value) -> Option<PriceTier> {
    let price = raw
        .get("price")
        .or_else(|| raw.get("price_per_tier"))
        .and_then(parse_money)?;

    let start = raw
        .get("start")
        .or_else(|| raw.get("start_days"))
        .and_then(parse_bound)?;

    let DayBound::Days(start_days) = start else {
        return Some(PriceTier::Default { price });
    };

    // only an explicit "default" opens the range
    let end = raw
        .get("end")
        .or_else(|| raw.get("end_days"))
        .and_then(parse_bound)?;

    match end {
        DayBound::Default => Some(PriceTier::Ranged {
            start_days,
            end_days: None,
            price,
        }),
        DayBound::Days(end_days) => Some(PriceTier::Ranged {
            start_days,
            end_days: Some(end_days),
            price,
        }),
    }
}

fn parse_bound(raw: &Value) -> Option<DayBound> {
    match raw {
        Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()).map(DayBound::Days),
        Value::String(s) if s.eq_ignore_ascii_case(DEFAULT_SENTINEL) => Some(DayBound::Default),
        Value::String(s) => s.trim().parse::<u32>().ok().map(DayBound::Days),
        _ => None,
    }
}

/// Parse a non-negative amount from a JSON number or numeric string.
fn parse_money(raw: &Value) -> Option<Decimal> {
    let amount = match raw {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()?
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok()?,
        _ => return None,
    };

    (amount >= Decimal::ZERO).then_some(amount)
}

/// Read and parse the catalog file.
pub async fn load_catalog(path: &Path) -> Result<Vec<FleetUnit>> {
    let text = tokio::fs::read_to_string(path).await?;
    let raw: Value = serde_json::from_str(&text)?;
    parse_catalog(&raw)
}

/// Read closure rules; a missing path or file falls back to the defaults.
pub async fn load_closure_rules(path: Option<&Path>) -> Result<ClosureRules> {
    let Some(path) = path else {
        return Ok(ClosureRules::default());
    };

    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Closure rules file {} not found, using default closures",
                path.display()
            );
            Ok(ClosureRules::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load catalog and closures into a fresh snapshot.
pub async fn load_snapshot(
    catalog_path: &Path,
    closures_path: Option<&Path>,
    version: u64,
) -> Result<FleetSnapshot> {
    let units = load_catalog(catalog_path).await?;
    let rules = load_closure_rules(closures_path).await?;
    let snapshot = FleetSnapshot::new(version, units, rules);

    info!(
        "Loaded fleet snapshot v{} with {} units from {}",
        snapshot.version,
        snapshot.units.len(),
        catalog_path.display()
    );

    Ok(snapshot)
}
