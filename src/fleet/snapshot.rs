//! Immutable fleet snapshot.
//!
//! The service never mutates a published snapshot. Booking arrivals and catalog
//! reloads build a new value which replaces the old one wholesale.

use std::collections::HashSet;

use tracing::warn;

use super::models::{BookingMap, ClosureRules, FleetUnit};

#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub version: u64,
    pub units: Vec<FleetUnit>,
    pub rules: ClosureRules,
}

impl FleetSnapshot {
    /// Build a snapshot, dropping later records whose identifier was already seen.
    pub fn new(
        version: u64,
        units: impl IntoIterator<Item = FleetUnit>,
        rules: ClosureRules,
    ) -> Self {
        let mut seen = HashSet::new();
        let units = units
            .into_iter()
            .filter(|unit| {
                let first = seen.insert(unit.identifier.clone());
                if !first {
                    warn!("Dropping duplicate fleet unit: {}", unit.identifier);
                }
                first
            })
            .collect();

        Self {
            version,
            units,
            rules,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new(), ClosureRules::default())
    }

    pub fn get(&self, identifier: &str) -> Option<&FleetUnit> {
        self.units.iter().find(|unit| unit.identifier == identifier)
    }

    /// New snapshot with booking data merged into one unit.
    ///
    /// Returns `None` if the unit is not part of this snapshot.
    pub fn with_bookings(&self, identifier: &str, bookings: BookingMap) -> Option<Self> {
        let position = self
            .units
            .iter()
            .position(|unit| unit.identifier == identifier)?;

        let mut units = self.units.clone();
        units[position] = units[position].with_bookings(bookings);

        Some(Self {
            version: self.version + 1,
            units,
            rules: self.rules.clone(),
        })
    }

    /// Units still waiting on booking data
    pub fn pending_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.loading).count()
    }
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, name: &str) -> FleetUnit {
        FleetUnit::new(id, name, vec![])
    }

    #[test]
    fn test_duplicates_keep_first() {
        let snapshot = FleetSnapshot::new(
            1,
            vec![
                unit("gs", "First GS"),
                unit("mt07", "MT-07"),
                unit("gs", "Second GS"),
            ],
            ClosureRules::default(),
        );

        assert_eq!(snapshot.units.len(), 2);
        assert_eq!(snapshot.get("gs").unwrap().display_name, "First GS");
        assert_eq!(snapshot.units[1].identifier, "mt07");
    }

    #[test]
    fn test_with_bookings_replaces_snapshot() {
        let snapshot = FleetSnapshot::new(
            3,
            vec![unit("gs", "GS"), unit("mt07", "MT-07")],
            ClosureRules::default(),
        );
        let bookings: BookingMap = [("2026/02/09", true)].into_iter().collect();

        let next = snapshot.with_bookings("mt07", bookings.clone()).unwrap();

        assert_eq!(next.version, 4);
        assert_eq!(next.get("mt07").unwrap().bookings, Some(bookings));
        assert!(!next.get("mt07").unwrap().loading);
        assert!(next.get("gs").unwrap().loading);
        assert_eq!(next.pending_count(), 1);

        // the original is untouched
        assert_eq!(snapshot.version, 3);
        assert!(snapshot.get("mt07").unwrap().loading);
        assert_eq!(snapshot.pending_count(), 2);
    }

    #[test]
    fn test_with_bookings_unknown_unit() {
        let snapshot = FleetSnapshot::new(1, vec![unit("gs", "GS")], ClosureRules::default());
        assert!(snapshot.with_bookings("nope", BookingMap::new()).is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = FleetSnapshot::default();
        assert_eq!(snapshot.version, 0);
        assert!(snapshot.units.is_empty());
        assert_eq!(snapshot.rules, ClosureRules::default());
    }
}
