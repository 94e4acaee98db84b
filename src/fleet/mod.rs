//! Fleet availability and pricing engine.
//!
//! Classifies each unit's calendar dates, prices rentals from tiered rate
//! tables and filters/sorts the fleet for display. The engine itself is pure;
//! `routes` exposes it over HTTP against the current snapshot.

pub mod calculators;
pub mod catalog;
pub mod classifier;
pub mod filter;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod snapshot;

// Re-export commonly used items
pub use calculators::{price_for_duration, quote, round_money};
pub use classifier::classify;
pub use filter::{filter_and_sort, SortDirective};
pub use models::{BookingMap, ClosureRules, DateStatus, FleetUnit, PriceTier};
pub use routes::router;
pub use snapshot::FleetSnapshot;
