//! Raw order → [`NormalizedOrder`] conversion.
//!
//! Normalization is total: a malformed total, an unparseable delivery date or
//! missing metadata degrades that one field (to `None`, a placeholder or an
//! empty string) and never rejects the record.

pub mod metadata;
pub mod policy;

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::date::{parse_local_date, parse_timestamp};
use crate::types::{NormalizedOrder, OrderStatus, RawOrder};

pub use metadata::MetadataIndex;
pub use policy::{Fallback, Field, FieldPolicy, POLICIES, Source};

/// Substrings that mark a shipping method as in-store pickup.
const PICKUP_MARKERS: [&str; 2] = ["retiro", "pickup"];

/// Normalize one raw order.
#[must_use]
pub fn normalize(raw: &RawOrder) -> NormalizedOrder {
    let meta = MetadataIndex::new(&raw.meta_data);
    let field = |field: Field, record_value: &str| policy::resolve(field, record_value, &meta);

    let method = raw
        .shipping_lines
        .first()
        .map(|line| line.method_title.as_str())
        .unwrap_or_default();
    let delivery_type = field(Field::DeliveryType, method);
    let is_pickup = is_pickup_method(&delivery_type);

    let delivery_date_label = field(Field::DeliveryDateLabel, "");
    let delivery_date = parse_local_date(&delivery_date_label);
    if delivery_date.is_none() && delivery_date_label != policy::NO_DATE {
        debug!(order_id = %raw.id, label = %delivery_date_label, "Unparseable delivery date");
    }

    let total = parse_total(&raw.total);
    if total.is_none() {
        debug!(order_id = %raw.id, total = %raw.total, "Malformed order total");
    }

    let status = OrderStatus::parse(&raw.status);
    if !status.is_known() {
        debug!(order_id = %raw.id, status = %status, "Unrecognized order status");
    }

    NormalizedOrder {
        id: raw.id,
        status,
        customer_name: field(
            Field::CustomerName,
            &full_name(&raw.billing.first_name, &raw.billing.last_name),
        ),
        customer_phone: field(Field::CustomerPhone, &raw.billing.phone),
        customer_email: field(Field::CustomerEmail, &raw.billing.email),
        recipient_name: field(
            Field::RecipientName,
            &full_name(&raw.shipping.first_name, &raw.shipping.last_name),
        ),
        recipient_phone: field(Field::RecipientPhone, ""),
        is_pickup,
        delivery_address: field(Field::DeliveryAddress, &raw.shipping.address_1),
        delivery_type,
        delivery_date_label,
        delivery_date,
        delivery_slot: field(Field::DeliverySlot, ""),
        total,
        notes: field(Field::Notes, ""),
        observation: field(Field::Observation, ""),
        created_at: parse_timestamp(&raw.date_created),
        items: raw
            .line_items
            .iter()
            .map(|item| format!("{} x {}", item.quantity, item.name))
            .collect(),
    }
}

/// Normalize a batch, preserving input order.
#[must_use]
pub fn normalize_all(raws: &[RawOrder]) -> Vec<NormalizedOrder> {
    raws.iter().map(normalize).collect()
}

/// Whether a shipping-method label denotes in-store pickup.
///
/// This is a heuristic over free text: anything without a pickup marker is
/// treated as a delivery.
#[must_use]
pub fn is_pickup_method(label: &str) -> bool {
    let label = label.to_lowercase();
    PICKUP_MARKERS.iter().any(|marker| label.contains(marker))
}

/// Parse a decimal total. Returns `None` for anything that is not a number.
///
/// An empty or blank total is zero.
#[must_use]
pub fn parse_total(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn full_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
