//! Core types for La Floresta orders.
//!
//! This module provides the raw wire records, the normalized order model and
//! type-safe wrappers for IDs and statuses.

pub mod id;
pub mod order;
pub mod raw;
pub mod status;

pub use id::*;
pub use order::NormalizedOrder;
pub use raw::{MetaEntry, RawBilling, RawLineItem, RawOrder, RawShipping, RawShippingLine};
pub use status::OrderStatus;
