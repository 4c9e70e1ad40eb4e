//! La Floresta Pedidos - read-only orders dashboard.
//!
//! Serves a single page over the shop's WooCommerce orders for one month:
//! metric cards, order cards, a sortable table and a delivery calendar.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates rendered on the server
//! - `woocommerce` fetches every page of the month and normalizes it
//! - Filtering, sorting, metrics and calendar grouping live in
//!   `floresta-core`; this crate only maps query parameters to them
//!
//! Credentials come from the environment and never reach the browser.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod routes;
pub mod state;
pub mod woocommerce;

pub use config::{ConfigError, DashboardConfig, WooConfig};
pub use error::AppError;
pub use routes::app;
pub use state::AppState;
pub use woocommerce::{FetchWindow, WooClient, WooError};
