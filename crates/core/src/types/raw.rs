//! Raw order records as delivered by the WooCommerce v3 `orders` endpoint.
//!
//! Only the fields the normalizer reads are modelled. Sub-objects and lists
//! default to empty and nullable strings collapse to `""`, so a structurally
//! partial record still deserializes and normalizes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::{LineItemId, OrderId};

/// An order exactly as received, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub id: OrderId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    /// Order total as a decimal string (e.g. `"24990.00"`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub total: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: String,
    /// Creation timestamp in site-local time (e.g. `"2024-01-15T10:30:00"`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_created: String,
    #[serde(default)]
    pub date_paid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billing: RawBilling,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping: RawShipping,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<RawLineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping_lines: Vec<RawShippingLine>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaEntry>,
}

/// Billing contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBilling {
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
}

/// Shipping contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShipping {
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address_1: String,
}

/// A purchased product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLineItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<LineItemId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Unreadable quantities become 0.
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: i64,
}

/// A shipping method applied to the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShippingLine {
    #[serde(default, deserialize_with = "lenient_text")]
    pub method_title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub total: String,
}

/// A free-form metadata entry. Keys may repeat; values are arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

impl MetaEntry {
    /// Convenience constructor for a string-valued entry.
    #[must_use]
    pub fn text(key: &str, value: &str) -> Self {
        Self {
            id: None,
            key: key.to_string(),
            value: Value::String(value.to_string()),
        }
    }
}

/// Accept a string, a number or `null` where the API documents a string.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// An integer sent as a number or a numeric string.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accept a numeric id, a numeric string, `null` or garbage (as `None`).
fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    Ok(integer(&Value::deserialize(deserializer)?).map(T::from))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(integer(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_woocommerce_order() {
        let json = r#"{
            "id": 4521,
            "status": "processing",
            "total": "24990.00",
            "currency": "CLP",
            "date_created": "2024-01-15T10:30:00",
            "date_paid": null,
            "billing": {"first_name": "Juan", "last_name": "Pérez", "phone": "+56911111111", "email": "juan@example.cl"},
            "shipping": {"first_name": "Ana", "last_name": "Soto", "address_1": "Av. Providencia 123"},
            "line_items": [{"id": 1, "name": "Ramo de rosas", "quantity": 2}],
            "shipping_lines": [{"method_title": "Despacho a domicilio", "total": "3990"}],
            "meta_data": [{"id": 9, "key": "Horario de entrega", "value": "10:00 - 13:00"}]
        }"#;

        let order: RawOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId::new(4521));
        assert_eq!(order.billing.last_name, "Pérez");
        assert_eq!(order.line_items[0].quantity, 2);
        assert_eq!(order.meta_data[0].value, Value::String("10:00 - 13:00".into()));
        assert!(order.date_paid.is_none());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let order: RawOrder = serde_json::from_str(r#"{"id": 7, "shipping": null}"#).unwrap();
        assert!(order.status.is_empty());
        assert!(order.shipping.address_1.is_empty());
        assert!(order.line_items.is_empty());
        assert!(order.meta_data.is_empty());
    }

    #[test]
    fn test_numeric_total_is_kept_as_text() {
        let order: RawOrder =
            serde_json::from_str(r#"{"id": 7, "total": 15000, "billing": {"phone": null}}"#)
                .unwrap();
        assert_eq!(order.total, "15000");
        assert!(order.billing.phone.is_empty());
    }

    #[test]
    fn test_malformed_numbers_do_not_fail_the_order() {
        let json = r#"{
            "id": 1,
            "line_items": [
                {"id": "31", "name": "Ramo", "quantity": "2"},
                {"id": null, "name": "Tarjeta", "quantity": null},
                {"id": "abc", "name": "Globo", "quantity": "muchos"}
            ],
            "meta_data": [{"id": "x", "key": "Horario de entrega", "value": "tarde"}]
        }"#;

        let order: RawOrder = serde_json::from_str(json).unwrap();
        let quantities: Vec<i64> = order.line_items.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![2, 0, 0]);
        assert_eq!(order.line_items[0].id, Some(LineItemId::new(31)));
        assert_eq!(order.line_items[1].id, None);
        assert_eq!(order.line_items[2].id, None);
        assert_eq!(order.meta_data[0].id, None);
    }
}
