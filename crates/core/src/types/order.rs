//! The normalized order record produced by [`crate::normalize`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::status::OrderStatus;

/// An order after field extraction and fallback resolution.
///
/// Built once per raw record and never mutated afterwards; the query and
/// aggregation functions only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    pub id: OrderId,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    /// Whether the customer collects the order in person.
    pub is_pickup: bool,
    /// Shipping street address; empty when absent (views pick their own fallback).
    pub delivery_address: String,
    /// Label of the first shipping method line.
    pub delivery_type: String,
    /// Delivery date exactly as written in the order metadata.
    pub delivery_date_label: String,
    /// Parsed delivery date, if the label could be parsed.
    pub delivery_date: Option<NaiveDate>,
    pub delivery_slot: String,
    /// Order total; `None` when the upstream total was not a number.
    pub total: Option<Decimal>,
    pub notes: String,
    pub observation: String,
    /// Creation time in site-local wall-clock time; `None` if unparseable.
    pub created_at: Option<NaiveDateTime>,
    /// `"<quantity> x <name>"` per line item, in input order.
    pub items: Vec<String>,
}

impl NormalizedOrder {
    /// The delivery date at midnight if known, otherwise the creation time.
    ///
    /// This is the default ordering key for the dashboard.
    #[must_use]
    pub fn effective_timestamp(&self) -> Option<NaiveDateTime> {
        self.delivery_date
            .map(|date| date.and_time(NaiveTime::MIN))
            .or(self.created_at)
    }

    /// The total, treating a malformed amount as zero.
    #[must_use]
    pub fn total_or_zero(&self) -> Decimal {
        self.total.unwrap_or(Decimal::ZERO)
    }
}
