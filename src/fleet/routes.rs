//! Fleet API route handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::AppCache;
use crate::error::{AppError, Result};
use crate::AppState;

use super::calculators::{price_for_duration, quote};
use super::catalog;
use super::classifier::{calendar, classify};
use super::filter::filter_and_sort;
use super::models::{BookingMap, FleetUnit};
use super::requests::{resolve_duration, CalendarQuery, FleetListQuery, PriceQuery};
use super::responses::{
    CalendarResponse, DateStatusResponse, FleetListResponse, FleetRowResponse, MoneyResponse,
    PriceQuoteResponse, SnapshotResponse,
};

/// Routes mounted under `/api/fleet`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fleet))
        .route("/reload", post(reload))
        .route("/:id/price", get(unit_price))
        .route("/:id/calendar", get(unit_calendar))
        .route("/:id/bookings", put(put_bookings))
}

fn unit_not_found(identifier: &str) -> AppError {
    AppError::NotFound(format!("Fleet unit '{}'", identifier))
}

/// Filtered and sorted fleet table
pub async fn list_fleet(
    State(state): State<AppState>,
    Query(query): Query<FleetListQuery>,
) -> Result<Json<FleetListResponse>> {
    let duration = resolve_duration(query.duration.as_deref(), state.config.default_duration)?;
    let dates = query.selected_dates()?;
    let sort = query.sort_directive()?;
    let snapshot = state.snapshot().await;
    let currency = &state.config.currency;

    let units = filter_and_sort(&snapshot.units, &snapshot.rules, &dates, sort, duration)
        .into_iter()
        .map(|unit| FleetRowResponse {
            identifier: unit.identifier.clone(),
            display_name: unit.display_name.clone(),
            price: MoneyResponse::rounded(price_for_duration(&unit.price_tiers, duration), currency),
            loading: unit.loading,
            statuses: dates
                .iter()
                .map(|date| DateStatusResponse {
                    date: *date,
                    status: classify(unit, &snapshot.rules, *date),
                })
                .collect(),
        })
        .collect();

    Ok(Json(FleetListResponse {
        snapshot_version: snapshot.version,
        duration,
        sort,
        units,
    }))
}

/// Price quote for one unit
pub async fn unit_price(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceQuoteResponse>> {
    let duration = resolve_duration(query.duration.as_deref(), state.config.default_duration)?;
    let snapshot = state.snapshot().await;
    let unit: &FleetUnit = snapshot
        .get(&identifier)
        .ok_or_else(|| unit_not_found(&identifier))?;

    Ok(Json(PriceQuoteResponse::from_quote(
        &unit.identifier,
        duration,
        quote(unit, duration),
        &state.config.currency,
    )))
}

/// Consecutive date statuses for one unit
pub async fn unit_calendar(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>> {
    let from = query.start_date(Local::now().date_naive())?;
    let days = query.day_count()?;
    let snapshot = state.snapshot().await;

    let key = AppCache::calendar_key(snapshot.version, &identifier, from, days);
    if let Some(cached) = state.cache.calendars.get(&key).await {
        debug!("Cache HIT for calendar: {}", key);
        return Ok(Json((*cached).clone()));
    }
    debug!("Cache MISS for calendar: {}", key);

    let unit = snapshot
        .get(&identifier)
        .ok_or_else(|| unit_not_found(&identifier))?;

    let response = CalendarResponse {
        identifier: unit.identifier.clone(),
        snapshot_version: snapshot.version,
        days: calendar(unit, &snapshot.rules, from, days)
            .into_iter()
            .map(|(date, status)| DateStatusResponse { date, status })
            .collect(),
    };

    state
        .cache
        .calendars
        .insert(key, Arc::new(response.clone()))
        .await;

    Ok(Json(response))
}

/// Merge booking data that arrived for one unit.
///
/// A payload that is not a JSON object is ignored and the unit stays pending.
pub async fn put_bookings(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<SnapshotResponse>> {
    let Some(raw) = payload.as_object() else {
        warn!(
            "Ignoring malformed booking data for unit {}: expected an object",
            identifier
        );
        let snapshot = state.snapshot().await;
        if snapshot.get(&identifier).is_none() {
            return Err(unit_not_found(&identifier));
        }
        return Ok(Json(SnapshotResponse::from_snapshot(&snapshot)));
    };

    let bookings = BookingMap::from_json(raw);
    let booked_days = bookings.len();
    let snapshot = state
        .merge_bookings(&identifier, bookings)
        .await
        .ok_or_else(|| unit_not_found(&identifier))?;

    info!(
        "Bookings merged for unit {} ({} flags), snapshot v{}",
        identifier, booked_days, snapshot.version
    );

    Ok(Json(SnapshotResponse::from_snapshot(&snapshot)))
}

/// Reload catalog and closure files, discarding all booking data
pub async fn reload(State(state): State<AppState>) -> Result<Json<SnapshotResponse>> {
    let config = &state.config;
    let loaded =
        catalog::load_snapshot(&config.catalog_path, config.closures_path.as_deref(), 0).await?;
    let snapshot = state.replace_snapshot(loaded).await;

    Ok(Json(SnapshotResponse::from_snapshot(&snapshot)))
}
