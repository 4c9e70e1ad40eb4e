//! Calendar-date parsing for the Spanish labels written by the delivery-date
//! checkout plugin ("15 enero, 2024"), plus ISO day keys.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::text::fold;

/// `<day> <month name> <year>` after lowercasing and comma removal.
static DATE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})\s+([a-záéíóú]+)\s+([0-9]{4})$").expect("Invalid regex")
});

/// Spanish month names. `setiembre` is the older spelling still used in Chile.
const MONTHS: [(&str, u32); 13] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Parse a Spanish calendar-date label such as `"15 enero 2024"`.
///
/// Returns `None` when the text does not match the grammar or the month name
/// is unknown. Days are not range-checked: they roll over with calendar
/// arithmetic, so `"31 febrero 2024"` is 2 March 2024 and `"0 marzo 2024"` is
/// 29 February 2024.
#[must_use]
pub fn parse_local_date(text: &str) -> Option<NaiveDate> {
    let clean = text.to_lowercase().replace(',', "");
    let caps = DATE_LABEL_RE.captures(clean.trim())?;

    let day: i64 = caps.get(1)?.as_str().parse().ok()?;
    let month = month_number(caps.get(2)?.as_str())?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_signed(Duration::days(day - 1))
}

fn month_number(name: &str) -> Option<u32> {
    let token = fold(name);
    MONTHS
        .iter()
        .find(|(month, _)| fold(month) == token)
        .map(|&(_, number)| number)
}

/// Format the calendar day of `date` as `YYYY-MM-DD`.
///
/// Only the date fields are read, so a date and any timestamp on that same
/// day produce the same key.
#[must_use]
pub fn to_iso_day<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse an order timestamp.
///
/// WooCommerce sends site-local times without an offset
/// (`2024-01-15T10:30:00`); RFC 3339 strings with an offset are accepted too
/// and keep the wall-clock time of that offset.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveTime, Timelike};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_label() {
        assert_eq!(parse_local_date("15 enero 2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_parse_label_with_comma_case_and_padding() {
        assert_eq!(parse_local_date("  3 Marzo, 2025 "), Some(ymd(2025, 3, 3)));
        assert_eq!(parse_local_date("09 DICIEMBRE 2024"), Some(ymd(2024, 12, 9)));
    }

    #[test]
    fn test_parse_historical_september_spelling() {
        assert_eq!(parse_local_date("18 setiembre 2024"), Some(ymd(2024, 9, 18)));
        assert_eq!(parse_local_date("18 septiembre 2024"), Some(ymd(2024, 9, 18)));
    }

    #[test]
    fn test_parse_accented_month_token() {
        assert_eq!(parse_local_date("1 énero 2024"), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_out_of_range_day_rolls_over() {
        assert_eq!(parse_local_date("31 febrero 2024"), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_local_date("0 marzo 2024"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_local_date("99 diciembre 2024"), Some(ymd(2025, 3, 9)));
    }

    #[test]
    fn test_rejects_non_matching_text() {
        assert_eq!(parse_local_date("abc"), None);
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("Sin fecha"), None);
        assert_eq!(parse_local_date("15 foo 2024"), None);
        assert_eq!(parse_local_date("15/01/2024"), None);
        assert_eq!(parse_local_date("15 enero 24"), None);
        assert_eq!(parse_local_date("1705276800"), None);
    }

    #[test]
    fn test_iso_day_is_zero_padded() {
        assert_eq!(to_iso_day(&ymd(2024, 3, 7)), "2024-03-07");
    }

    #[test]
    fn test_iso_day_ignores_time_of_day() {
        let day = ymd(2024, 1, 15);
        let morning = day.and_time(NaiveTime::MIN);
        let night = day.and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(to_iso_day(&morning), to_iso_day(&night));
        assert_eq!(to_iso_day(&morning), to_iso_day(&day));
    }

    #[test]
    fn test_parse_timestamp_site_local() {
        let ts = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(ts.date(), ymd(2024, 1, 15));
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_with_fraction_and_offset() {
        assert!(parse_timestamp("2024-01-15T10:30:00.250").is_some());
        let ts = parse_timestamp("2024-01-15T10:30:00-03:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("ayer").is_none());
    }
}
