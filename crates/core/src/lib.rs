//! La Floresta Core - order normalization and query pipeline.
//!
//! This crate turns raw WooCommerce orders into a strict internal model and
//! provides the pure functions the dashboard and CLI build on:
//! - `dashboard` - Read-only orders dashboard (table, cards, calendar)
//! - `cli` - Command-line listing, summaries and exports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Every function is deterministic and never mutates its
//! input, so callers may invoke them from anywhere and memoize freely.
//!
//! # Modules
//!
//! - [`types`] - Raw wire records, normalized orders, IDs and statuses
//! - [`date`] - Spanish calendar-date parsing and ISO day keys
//! - [`normalize`] - Metadata lookup, field policies and the normalizer
//! - [`query`] - Filtering, free-text search and table sorting
//! - [`metrics`] - Order counts and amounts by fulfillment type
//! - [`calendar`] - Per-day grouping and month grids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod calendar;
pub mod date;
pub mod metrics;
pub mod normalize;
pub mod query;
pub mod text;
pub mod types;

pub use metrics::{Metrics, summarize};
pub use normalize::{normalize, normalize_all};
pub use query::{OrderFilters, SortDirection, SortKey, SortState, select_and_sort, sort_by};
pub use types::*;
