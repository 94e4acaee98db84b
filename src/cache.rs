//! In-memory caching using moka
//!
//! Calendar responses are cheap to compute but requested for every visible
//! row on each render, so they are memoized per snapshot version.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use chrono::NaiveDate;

use crate::fleet::responses::CalendarResponse;

/// Application cache holding derived per-snapshot data
#[derive(Clone)]
pub struct AppCache {
    /// Unit calendars (version:unit:from:days -> CalendarResponse)
    pub calendars: Cache<String, Arc<CalendarResponse>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Calendars: tens of units x a few windows, 10 min TTL
            calendars: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            calendars_size: self.calendars.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.calendars.invalidate_all();
        info!("All caches invalidated");
    }

    /// Generate cache key for a unit calendar
    pub fn calendar_key(version: u64, identifier: &str, from: NaiveDate, days: u32) -> String {
        format!("calendar:{}:{}:{}:{}", version, identifier, from, days)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub calendars_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_key_includes_version() {
        let from = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let a = AppCache::calendar_key(1, "gs", from, 30);
        let b = AppCache::calendar_key(2, "gs", from, 30);
        assert_eq!(a, "calendar:1:gs:2026-02-01:30");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_insert_and_invalidate() {
        let cache = AppCache::new();
        let from = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let key = AppCache::calendar_key(1, "gs", from, 1);
        cache
            .calendars
            .insert(
                key.clone(),
                Arc::new(CalendarResponse {
                    identifier: "gs".to_string(),
                    snapshot_version: 1,
                    days: vec![],
                }),
            )
            .await;

        assert!(cache.calendars.get(&key).await.is_some());
        cache.calendars.run_pending_tasks().await;
        assert_eq!(cache.stats().calendars_size, 1);

        cache.invalidate_all();
        assert!(cache.calendars.get(&key).await.is_none());
    }
}
