//! Per-day grouping of orders and month grids for the calendar view.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::date::to_iso_day;
use crate::types::NormalizedOrder;

/// Orders keyed by the ISO day of their delivery date.
///
/// Orders without a parsed delivery date are skipped. Within a day, orders
/// keep their input order.
#[must_use]
pub fn group_by_day<'a, I>(orders: I) -> BTreeMap<String, Vec<&'a NormalizedOrder>>
where
    I: IntoIterator<Item = &'a NormalizedOrder>,
{
    let mut grouped: BTreeMap<String, Vec<&NormalizedOrder>> = BTreeMap::new();
    for order in orders {
        if let Some(date) = order.delivery_date {
            grouped.entry(to_iso_day(&date)).or_default().push(order);
        }
    }
    grouped
}

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from `month`.
///
/// Returns the unshifted month start if the result is out of range.
#[must_use]
pub fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let start = month_start(month);
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

/// The days shown for `month`: whole Monday-first weeks covering the month,
/// padded with days of the neighbouring months.
#[must_use]
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    let first = month_start(month);
    let last = shift_month(first, 1).pred_opt().unwrap_or(first);

    let lead = u64::from(first.weekday().num_days_from_monday());
    let trail = 6 - u64::from(last.weekday().num_days_from_monday());

    let Some(grid_start) = first.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };
    let Some(grid_end) = last.checked_add_days(Days::new(trail)) else {
        return Vec::new();
    };
    grid_start.iter_days().take_while(|day| *day <= grid_end).collect()
}

/// The month the calendar opens on: the month of the first order with a
/// delivery date, or the month of `today`.
#[must_use]
pub fn initial_month<'a, I>(orders: I, today: NaiveDate) -> NaiveDate
where
    I: IntoIterator<Item = &'a NormalizedOrder>,
{
    orders
        .into_iter()
        .find_map(|order| order.delivery_date)
        .map_or_else(|| month_start(today), month_start)
}

/// The day selected when the calendar opens: today if it has orders,
/// otherwise the earliest day with orders, otherwise today.
#[must_use]
pub fn default_day(grouped: &BTreeMap<String, Vec<&NormalizedOrder>>, today: NaiveDate) -> String {
    let today_key = to_iso_day(&today);
    if grouped.contains_key(&today_key) {
        return today_key;
    }
    grouped.keys().next().cloned().unwrap_or(today_key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::normalize::normalize;
    use crate::types::{MetaEntry, RawOrder};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(id: i64, label: &str) -> NormalizedOrder {
        let raw: RawOrder = serde_json::from_value(serde_json::json!({ "id": id })).unwrap();
        normalize(&RawOrder {
            meta_data: vec![MetaEntry::text("Fecha de envío o retiro", label)],
            ..raw
        })
    }

    #[test]
    fn test_group_by_day_skips_undated_and_keeps_order() {
        let orders = vec![
            dated(1, "15 enero 2024"),
            dated(2, "abc"),
            dated(3, "3 enero 2024"),
            dated(4, "15 enero, 2024"),
        ];
        let grouped = group_by_day(&orders);

        assert_eq!(grouped.len(), 2);
        let ids: Vec<i64> = grouped["2024-01-15"].iter().map(|o| o.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(grouped.keys().next().unwrap(), "2024-01-03");
    }

    #[test]
    fn test_shift_month_across_years() {
        assert_eq!(shift_month(ymd(2024, 12, 20), 1), ymd(2025, 1, 1));
        assert_eq!(shift_month(ymd(2024, 1, 31), -1), ymd(2023, 12, 1));
        assert_eq!(shift_month(ymd(2024, 3, 5), 0), ymd(2024, 3, 1));
    }

    #[test]
    fn test_month_grid_is_whole_monday_weeks() {
        // February 2024 starts on a Thursday and ends on a Thursday.
        let grid = month_grid(ymd(2024, 2, 10));
        assert_eq!(grid.len() % 7, 0);
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0], ymd(2024, 1, 29));
        assert_eq!(grid[0].weekday(), Weekday::Mon);
        assert_eq!(*grid.last().unwrap(), ymd(2024, 3, 3));
    }

    #[test]
    fn test_month_grid_without_padding() {
        // April 2024 starts on a Monday and ends on a Tuesday.
        let grid = month_grid(ymd(2024, 4, 1));
        assert_eq!(grid[0], ymd(2024, 4, 1));
        assert_eq!(grid.len(), 35);
    }

    #[test]
    fn test_initial_month() {
        let orders = vec![dated(1, "Sin fecha"), dated(2, "20 marzo 2024")];
        assert_eq!(initial_month(&orders, ymd(2024, 6, 9)), ymd(2024, 3, 1));
        assert_eq!(initial_month(&[], ymd(2024, 6, 9)), ymd(2024, 6, 1));
    }

    #[test]
    fn test_default_day() {
        let orders = vec![dated(1, "20 marzo 2024"), dated(2, "5 marzo 2024")];
        let grouped = group_by_day(&orders);

        assert_eq!(default_day(&grouped, ymd(2024, 3, 20)), "2024-03-20");
        assert_eq!(default_day(&grouped, ymd(2024, 3, 21)), "2024-03-05");
        assert_eq!(default_day(&BTreeMap::new(), ymd(2024, 3, 21)), "2024-03-21");
    }
}
