//! Motorent fleet availability and pricing service.
//!
//! Hosts the pure availability/pricing engine in `fleet` behind a small JSON
//! API consumed by the fleet dashboard.

pub mod cache;
pub mod config;
pub mod error;
pub mod fleet;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::cache::AppCache;
use crate::config::Config;
use crate::fleet::models::BookingMap;
use crate::fleet::responses::{HealthResponse, SnapshotResponse};
use crate::fleet::FleetSnapshot;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: AppCache,
    fleet: Arc<RwLock<Arc<FleetSnapshot>>>,
}

impl AppState {
    pub fn new(config: Config, snapshot: FleetSnapshot) -> Self {
        Self {
            config: Arc::new(config),
            cache: AppCache::new(),
            fleet: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Current snapshot; the lock is released before the caller computes anything.
    pub async fn snapshot(&self) -> Arc<FleetSnapshot> {
        self.fleet.read().await.clone()
    }

    /// Swap in a new snapshot, stamping it with the next version.
    pub async fn replace_snapshot(&self, mut next: FleetSnapshot) -> Arc<FleetSnapshot> {
        let mut current = self.fleet.write().await;
        next.version = current.version + 1;
        let next = Arc::new(next);
        *current = next.clone();
        drop(current);

        self.cache.invalidate_all();
        info!(
            "Fleet snapshot replaced: v{} with {} units",
            next.version,
            next.units.len()
        );
        next
    }

    /// Merge booking data for one unit into a new snapshot.
    ///
    /// Returns `None` if the unit is unknown. The write lock is held across the
    /// read-merge-swap so concurrent arrivals never drop each other.
    pub async fn merge_bookings(
        &self,
        identifier: &str,
        bookings: BookingMap,
    ) -> Option<Arc<FleetSnapshot>> {
        let mut current = self.fleet.write().await;
        let next = Arc::new(current.with_bookings(identifier, bookings)?);
        *current = next.clone();
        drop(current);

        self.cache.invalidate_all();
        Some(next)
    }
}

/// Health check handler
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        snapshot: SnapshotResponse::from_snapshot(&snapshot),
        cache: state.cache.stats(),
    })
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/fleet", fleet::router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
