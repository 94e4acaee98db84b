//! Fleet listing: filter by selected dates, then sort.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::calculators::price_for_duration;
use super::classifier::is_free_on_any;
use super::models::{ClosureRules, FleetUnit};

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirective {
    #[default]
    #[serde(rename = "price_asc")]
    PriceAscending,
    #[serde(rename = "price_desc")]
    PriceDescending,
    Name,
}

impl FromStr for SortDirective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price_asc" | "asc" => Ok(SortDirective::PriceAscending),
            "price_desc" | "desc" => Ok(SortDirective::PriceDescending),
            "name" => Ok(SortDirective::Name),
            other => Err(format!("unknown sort directive '{}'", other)),
        }
    }
}

/// Units to display, in display order.
///
/// With a non-empty selection a unit stays listed if it is available or on a
/// half day for at least one selected date. Sorting is stable, so units with
/// equal prices keep their catalog order in both price directions.
pub fn filter_and_sort<'a>(
    units: &'a [FleetUnit],
    rules: &ClosureRules,
    selected_dates: &[NaiveDate],
    sort: SortDirective,
    duration: u32,
) -> Vec<&'a FleetUnit> {
    let kept = units
        .iter()
        .filter(|unit| selected_dates.is_empty() || is_free_on_any(unit, rules, selected_dates));

    match sort {
        SortDirective::Name => {
            let mut listed: Vec<&FleetUnit> = kept.collect();
            listed.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            listed
        }
        SortDirective::PriceAscending | SortDirective::PriceDescending => {
            let mut priced: Vec<_> = kept
                .map(|unit| (price_for_duration(&unit.price_tiers, duration), unit))
                .collect();
            priced.sort_by(|(a, _), (b, _)| {
                let ord = a.cmp(b);
                if sort == SortDirective::PriceDescending {
                    ord.reverse()
                } else {
                    ord
                }
            });
            priced.into_iter().map(|(_, unit)| unit).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::models::{BookingMap, PriceTier};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unit(id: &str, name: &str, daily: Decimal, booked: &[&str]) -> FleetUnit {
        let bookings: BookingMap = booked.iter().map(|k| (*k, true)).collect();
        FleetUnit::new(id, name, vec![PriceTier::Default { price: daily }]).with_bookings(bookings)
    }

    fn ids(units: &[&FleetUnit]) -> Vec<String> {
        units.iter().map(|u| u.identifier.clone()).collect()
    }

    #[test]
    fn test_parse_sort_directive() {
        assert_eq!("price_asc".parse::<SortDirective>(), Ok(SortDirective::PriceAscending));
        assert_eq!("PRICE_DESC".parse::<SortDirective>(), Ok(SortDirective::PriceDescending));
        assert_eq!("name".parse::<SortDirective>(), Ok(SortDirective::Name));
        assert!("cheapest".parse::<SortDirective>().is_err());
    }

    #[test]
    fn test_empty_selection_keeps_all() {
        let units = vec![
            unit("a", "A", dec!(60), &["2026/02/09"]),
            FleetUnit::new("b", "B", vec![]),
        ];
        let listed = filter_and_sort(&units, &ClosureRules::default(), &[], SortDirective::Name, 1);
        assert_eq!(ids(&listed), vec!["a", "b"]);
    }

    #[test]
    fn test_free_on_one_of_two_dates_is_kept() {
        // Monday 9th and Tuesday 10th
        let dates = [date(2026, 2, 9), date(2026, 2, 10)];
        let units = vec![
            unit("one_free", "One free", dec!(60), &["2026/02/09"]),
            unit("none_free", "None free", dec!(60), &["2026/02/09_start", "2026/02/10_end"]),
        ];
        let listed = filter_and_sort(
            &units,
            &ClosureRules::default(),
            &dates,
            SortDirective::PriceAscending,
            1,
        );
        assert_eq!(ids(&listed), vec!["one_free"]);
    }

    #[test]
    fn test_booked_and_closed_is_excluded() {
        // Sunday 8th closed, Monday 9th booked
        let dates = [date(2026, 2, 8), date(2026, 2, 9)];
        let units = vec![unit("a", "A", dec!(60), &["2026/02/09"])];
        let listed =
            filter_and_sort(&units, &ClosureRules::default(), &dates, SortDirective::Name, 1);
        assert!(listed.is_empty());
    }

    #[test]
    fn test_half_day_counts_as_free() {
        let dates = [date(2026, 2, 7)];
        let units = vec![unit("a", "A", dec!(60), &[])];
        let listed =
            filter_and_sort(&units, &ClosureRules::default(), &dates, SortDirective::Name, 1);
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_pending_units_are_filtered_out_by_dates() {
        let units = vec![FleetUnit::new("p", "Pending", vec![])];
        let listed = filter_and_sort(
            &units,
            &ClosureRules::default(),
            &[date(2026, 2, 9)],
            SortDirective::Name,
            1,
        );
        assert!(listed.is_empty());
    }

    #[test]
    fn test_price_sort_is_stable() {
        let units = vec![
            unit("first", "Zeta", dec!(70), &[]),
            unit("cheap", "Alpha", dec!(40), &[]),
            unit("second", "Beta", dec!(70), &[]),
        ];
        let rules = ClosureRules::default();

        let asc = filter_and_sort(&units, &rules, &[], SortDirective::PriceAscending, 3);
        assert_eq!(ids(&asc), vec!["cheap", "first", "second"]);

        let desc = filter_and_sort(&units, &rules, &[], SortDirective::PriceDescending, 3);
        assert_eq!(ids(&desc), vec!["first", "second", "cheap"]);
    }

    #[test]
    fn test_price_sort_uses_active_duration() {
        let weekly = FleetUnit::new(
            "weekly",
            "Weekly",
            vec![
                PriceTier::Ranged {
                    start_days: 1,
                    end_days: Some(6),
                    price: dec!(300),
                },
                PriceTier::Ranged {
                    start_days: 7,
                    end_days: None,
                    price: dec!(350),
                },
            ],
        );
        let daily = FleetUnit::new("daily", "Daily", vec![PriceTier::Default { price: dec!(60) }]);
        let units = vec![weekly, daily];
        let rules = ClosureRules::default();

        // 2 days: 300 vs 120
        let short = filter_and_sort(&units, &rules, &[], SortDirective::PriceAscending, 2);
        assert_eq!(ids(&short), vec!["daily", "weekly"]);

        // 7 days: 350 vs 420
        let long = filter_and_sort(&units, &rules, &[], SortDirective::PriceAscending, 7);
        assert_eq!(ids(&long), vec!["weekly", "daily"]);
    }

    #[test]
    fn test_name_sort() {
        let units = vec![
            unit("c", "Triumph Tiger 900", dec!(90), &[]),
            unit("a", "BMW F 900 GS", dec!(80), &[]),
            unit("b", "Honda Africa Twin", dec!(85), &[]),
        ];
        let listed =
            filter_and_sort(&units, &ClosureRules::default(), &[], SortDirective::Name, 1);
        assert_eq!(ids(&listed), vec!["a", "b", "c"]);
    }
}
