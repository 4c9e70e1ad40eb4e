//! Per-field extraction and fallback rules.
//!
//! Every text field of [`NormalizedOrder`](crate::NormalizedOrder) that can
//! come out empty is listed here exactly once, together with where its value
//! comes from and what to show when it is missing. Fields with an
//! [`Fallback::Empty`] policy stay empty so the views can pick a contextual
//! message (a pickup never shows a missing-address placeholder).

use super::metadata::MetadataIndex;

pub const NO_NAME: &str = "Sin nombre";
pub const NO_PHONE: &str = "Sin teléfono";
pub const NO_EMAIL: &str = "Sin email";
pub const NO_RECIPIENT: &str = "Sin destinatario";
pub const NO_DATE: &str = "Sin fecha";
pub const NO_SLOT: &str = "Sin horario";
pub const NO_METHOD: &str = "No definido";

/// A derived text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    RecipientName,
    RecipientPhone,
    DeliveryAddress,
    DeliveryType,
    DeliveryDateLabel,
    DeliverySlot,
    Notes,
    Observation,
}

/// Where a field's value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Derived from the structured part of the record by the normalizer.
    Record,
    /// Looked up in the metadata list; candidate keys in priority order.
    Metadata(&'static [&'static str]),
}

/// What a field becomes when its source yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Placeholder(&'static str),
    Empty,
}

impl Fallback {
    /// Apply the fallback to an already trimmed value.
    #[must_use]
    pub fn apply(self, value: String) -> String {
        match self {
            Self::Placeholder(text) if value.is_empty() => text.to_string(),
            _ => value,
        }
    }
}

/// Extraction rule for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub field: Field,
    pub source: Source,
    pub fallback: Fallback,
}

/// The policy for `field`.
#[must_use]
pub const fn policy(field: Field) -> FieldPolicy {
    let (source, fallback) = match field {
        Field::CustomerName => (Source::Record, Fallback::Placeholder(NO_NAME)),
        Field::CustomerPhone => (Source::Record, Fallback::Placeholder(NO_PHONE)),
        Field::CustomerEmail => (Source::Record, Fallback::Placeholder(NO_EMAIL)),
        Field::RecipientName => (Source::Record, Fallback::Placeholder(NO_RECIPIENT)),
        Field::RecipientPhone => (
            Source::Metadata(&["shipping_telefono", "_shipping_telefono"]),
            Fallback::Placeholder(NO_PHONE),
        ),
        Field::DeliveryAddress => (Source::Record, Fallback::Empty),
        Field::DeliveryType => (Source::Record, Fallback::Placeholder(NO_METHOD)),
        Field::DeliveryDateLabel => (
            Source::Metadata(&["Fecha de envío o retiro", "_orddd_lite_timestamp"]),
            Fallback::Placeholder(NO_DATE),
        ),
        Field::DeliverySlot => (
            Source::Metadata(&["Horario de entrega", "_orddd_time_slot"]),
            Fallback::Placeholder(NO_SLOT),
        ),
        Field::Notes => (
            Source::Metadata(&["shipping_mensaje", "_shipping_mensaje"]),
            Fallback::Empty,
        ),
        Field::Observation => (
            Source::Metadata(&["shipping_observaciones", "_shipping_observaciones"]),
            Fallback::Empty,
        ),
    };
    FieldPolicy {
        field,
        source,
        fallback,
    }
}

/// The policy table, one entry per field.
pub const POLICIES: [FieldPolicy; 11] = [
    policy(Field::CustomerName),
    policy(Field::CustomerPhone),
    policy(Field::CustomerEmail),
    policy(Field::RecipientName),
    policy(Field::RecipientPhone),
    policy(Field::DeliveryAddress),
    policy(Field::DeliveryType),
    policy(Field::DeliveryDateLabel),
    policy(Field::DeliverySlot),
    policy(Field::Notes),
    policy(Field::Observation),
];

/// Resolve `field` for one order.
///
/// `record_value` is only consulted for [`Source::Record`] fields; metadata
/// fields ignore it.
#[must_use]
pub fn resolve(field: Field, record_value: &str, meta: &MetadataIndex<'_>) -> String {
    let policy = policy(field);
    let value = match policy.source {
        Source::Record => record_value.trim().to_string(),
        Source::Metadata(keys) => meta.lookup(keys),
    };
    policy.fallback.apply(value)
}
