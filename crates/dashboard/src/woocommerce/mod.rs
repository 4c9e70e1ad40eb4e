//! WooCommerce REST API order fetcher.
//!
//! Loads every order created inside a [`FetchWindow`] from the `orders`
//! endpoint, following the `X-WP-TotalPages` header page by page, and hands
//! the records to [`floresta_core::normalize_all`].
//!
//! # API Reference
//!
//! - Endpoint: `GET <WC_ORDERS_URL>?per_page=&page=&after=&before=&date_column=date_created`
//! - Authentication: HTTP basic auth with the REST consumer key and secret
//! - Pagination: `X-WP-Total` / `X-WP-TotalPages` response headers

mod client;

pub use client::WooClient;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use floresta_core::calendar::{month_start, shift_month};

/// Upper bound on pages requested for one window.
pub const MAX_PAGES: u32 = 50;

/// Errors that can occur while fetching orders.
#[derive(Debug, Error)]
pub enum WooError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The API kept returning full pages past the page ceiling.
    #[error("Pagination did not terminate after {0} pages")]
    Pagination(u32),

    /// The configured endpoint cannot be turned into a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl WooError {
    /// The single message shown to dashboard users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("No se pudo cargar pedidos ({status})"),
            Self::Http(e) => e.status().map_or_else(
                || "No se pudo conectar con la tienda".to_string(),
                |status| format!("No se pudo cargar pedidos ({})", status.as_u16()),
            ),
            Self::Parse(_) => "Respuesta inválida de la tienda".to_string(),
            Self::Pagination(_) => "La tienda devolvió demasiadas páginas de pedidos".to_string(),
            Self::InvalidUrl(_) => "URL de pedidos mal configurada".to_string(),
        }
    }
}

/// Creation-date window for an order fetch, in site-local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Inclusive lower bound.
    pub after: NaiveDateTime,
    /// Exclusive upper bound.
    pub before: NaiveDateTime,
}

impl FetchWindow {
    /// The whole calendar month containing `day`.
    #[must_use]
    pub fn month_of(day: NaiveDate) -> Self {
        let start = month_start(day);
        Self {
            after: start.and_time(NaiveTime::MIN),
            before: shift_month(start, 1).and_time(NaiveTime::MIN),
        }
    }

    /// The calendar month `year`-`month`, if it exists.
    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::month_of)
    }

    /// The month containing `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        Self::month_of(today)
    }

    /// The current month on this machine's clock.
    #[must_use]
    pub fn this_month() -> Self {
        Self::current_month(Local::now().date_naive())
    }

    /// Parse a `YYYY-MM` month key.
    #[must_use]
    pub fn parse_month(key: &str) -> Option<Self> {
        let (year, month) = key.trim().split_once('-')?;
        Self::month(year.parse().ok()?, month.parse().ok()?)
    }

    /// First day of the window's month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.after.date()
    }

    /// The window's `YYYY-MM` key.
    #[must_use]
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.after.year(), self.after.month())
    }

    /// Query-parameter form of a bound: `YYYY-MM-DDTHH:MM:SS`.
    #[must_use]
    pub fn format_bound(bound: NaiveDateTime) -> String {
        bound.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
