//! Display formatting and custom Askama template filters.
//!
//! Everything locale-specific lives here: currency, status labels, badge
//! classes and month names. The core crate only hands over plain values.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const STATUS_LABELS: [(&str, &str); 7] = [
    ("processing", "En proceso"),
    ("completed", "Completado"),
    ("pending", "Pendiente"),
    ("cancelled", "Cancelado"),
    ("on_hold", "En espera"),
    ("refunded", "Reembolsado"),
    ("failed", "Fallido"),
];

const STATUS_BADGES: [(&str, &str); 7] = [
    ("processing", "bg-amber-100 text-amber-800"),
    ("completed", "bg-emerald-100 text-emerald-800"),
    ("pending", "bg-slate-200 text-slate-700"),
    ("cancelled", "bg-rose-100 text-rose-700"),
    ("on_hold", "bg-orange-100 text-orange-700"),
    ("refunded", "bg-sky-100 text-sky-700"),
    ("failed", "bg-red-100 text-red-700"),
];

const DEFAULT_BADGE: &str = "bg-slate-100 text-slate-700";

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Display label for a status code. Unknown codes pass through unchanged.
#[must_use]
pub fn status_label(code: &str) -> &str {
    STATUS_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |&(_, label)| label)
}

/// Badge CSS classes for a status code.
#[must_use]
pub fn status_badge_class(code: &str) -> &'static str {
    STATUS_BADGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(DEFAULT_BADGE, |&(_, class)| class)
}

/// Format an amount as Chilean pesos: no decimals, `.` thousands separator.
///
/// `format_clp(dec!(12345.6))` is `"$12.346"`.
#[must_use]
pub fn format_clp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Spanish month title, e.g. `"enero de 2024"`.
#[must_use]
pub fn month_title(month: NaiveDate) -> String {
    let name = usize::try_from(month.month0())
        .ok()
        .and_then(|index| MONTH_NAMES.get(index))
        .copied()
        .unwrap_or_default();
    format!("{name} de {}", month.year())
}

// =============================================================================
// Askama filters
// =============================================================================

/// Formats a decimal amount as CLP.
///
/// Usage in templates: `{{ metrics.orders_amount|clp }}`
#[askama::filter_fn]
pub fn clp(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    Ok(text
        .parse::<Decimal>()
        .map_or(text, format_clp))
}

/// Translates a status code to its label.
///
/// Usage in templates: `{{ order.status|status_text }}`
#[askama::filter_fn]
pub fn status_text(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(status_label(&value.to_string()).to_string())
}

/// Badge classes for a status code.
///
/// Usage in templates: `<span class="{{ order.status|badge_class }}">`
#[askama::filter_fn]
pub fn badge_class(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(status_badge_class(&value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_known_and_unknown() {
        assert_eq!(status_label("processing"), "En proceso");
        assert_eq!(status_label("on_hold"), "En espera");
        assert_eq!(status_label("on-hold"), "on-hold");
        assert_eq!(status_label("wc-custom"), "wc-custom");
    }

    #[test]
    fn test_status_badge_class_default() {
        assert_eq!(status_badge_class("completed"), "bg-emerald-100 text-emerald-800");
        assert_eq!(status_badge_class("draft"), DEFAULT_BADGE);
    }

    #[test]
    fn test_format_clp_groups_thousands() {
        assert_eq!(format_clp(Decimal::new(12345, 0)), "$12.345");
        assert_eq!(format_clp(Decimal::new(1_234_567, 0)), "$1.234.567");
        assert_eq!(format_clp(Decimal::new(999, 0)), "$999");
        assert_eq!(format_clp(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_format_clp_rounds_to_whole_pesos() {
        assert_eq!(format_clp(Decimal::new(123_456, 1)), "$12.346");
        assert_eq!(format_clp(Decimal::new(2_499_050, 2)), "$24.991");
        assert_eq!(format_clp(Decimal::new(4, 1)), "$0");
    }

    #[test]
    fn test_format_clp_negative() {
        assert_eq!(format_clp(Decimal::new(-5000, 0)), "-$5.000");
        assert_eq!(format_clp(Decimal::new(-4, 1)), "$0");
    }

    #[test]
    fn test_month_title() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 18).unwrap();
        assert_eq!(month_title(date), "septiembre de 2024");
    }
}
