//! Filtering, free-text search and sorting over normalized orders.
//!
//! All functions borrow their input and return a new vector of references;
//! nothing here mutates or re-derives order fields.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text::natural_cmp;
use crate::types::{NormalizedOrder, OrderStatus};

/// Status filter. `All` is the pass-through sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Parse the form value: `"all"` or empty means no filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Self::All,
            code => Self::Only(OrderStatus::parse(code)),
        }
    }

    /// The form value for this filter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    #[must_use]
    pub fn matches(&self, status: &OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.as_str() == status.as_str(),
        }
    }
}

/// Fulfillment-type filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentFilter {
    #[default]
    All,
    Delivery,
    Pickup,
}

impl FulfillmentFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    #[must_use]
    pub const fn matches(self, is_pickup: bool) -> bool {
        match self {
            Self::All => true,
            Self::Delivery => !is_pickup,
            Self::Pickup => is_pickup,
        }
    }
}

impl FromStr for FulfillmentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(format!("invalid fulfillment filter: {s}")),
        }
    }
}

/// Combined filter criteria. All criteria must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
    pub status: StatusFilter,
    pub fulfillment: FulfillmentFilter,
    /// Free-text query; blank matches everything.
    pub search: String,
}

impl OrderFilters {
    /// Whether `order` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, order: &NormalizedOrder) -> bool {
        self.status.matches(&order.status)
            && self.fulfillment.matches(order.is_pickup)
            && matches_search(order, &self.search)
    }
}

/// The lowercased text searched by the free-text filter.
#[must_use]
pub fn search_haystack(order: &NormalizedOrder) -> String {
    [
        order.id.to_string().as_str(),
        &order.customer_name,
        &order.recipient_name,
        &order.recipient_phone,
        &order.delivery_date_label,
        &order.delivery_address,
        &order.customer_phone,
        &order.notes,
        &order.observation,
    ]
    .join(" ")
    .to_lowercase()
}

fn matches_search(order: &NormalizedOrder, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || search_haystack(order).contains(&query)
}

/// Filter `orders` and sort the result by effective timestamp, oldest first.
///
/// Orders with the same effective timestamp are ordered by id; orders with
/// no timestamp at all come first.
#[must_use]
pub fn select_and_sort<'a>(
    orders: &'a [NormalizedOrder],
    filters: &OrderFilters,
) -> Vec<&'a NormalizedOrder> {
    let mut selected: Vec<&NormalizedOrder> =
        orders.iter().filter(|order| filters.matches(order)).collect();
    selected.sort_by(|a, b| {
        a.effective_timestamp()
            .cmp(&b.effective_timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });
    selected
}

/// Distinct status values in first-seen order.
#[must_use]
pub fn statuses(orders: &[NormalizedOrder]) -> Vec<OrderStatus> {
    let mut seen: Vec<OrderStatus> = Vec::new();
    for order in orders {
        if !seen.contains(&order.status) {
            seen.push(order.status.clone());
        }
    }
    seen
}

// =============================================================================
// Table sort
// =============================================================================

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Customer,
    Reservation,
    Logistics,
    Message,
    Status,
    Total,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::Customer,
        Self::Reservation,
        Self::Logistics,
        Self::Message,
        Self::Status,
        Self::Total,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Customer => "customer",
            Self::Reservation => "reservation",
            Self::Logistics => "logistics",
            Self::Message => "message",
            Self::Status => "status",
            Self::Total => "total",
        }
    }

    /// Direction used when this column is first selected: newest id and
    /// highest total first, natural order for everything else.
    #[must_use]
    pub const fn default_direction(self) -> SortDirection {
        match self {
            Self::Id | Self::Total => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// Ascending comparison of two orders on this column.
    #[must_use]
    pub fn compare(self, a: &NormalizedOrder, b: &NormalizedOrder) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Customer => natural_cmp(&a.customer_name, &b.customer_name),
            Self::Reservation => a
                .effective_timestamp()
                .cmp(&b.effective_timestamp())
                .then_with(|| natural_cmp(&a.delivery_slot, &b.delivery_slot)),
            Self::Logistics => a
                .is_pickup
                .cmp(&b.is_pickup)
                .then_with(|| natural_cmp(&a.recipient_name, &b.recipient_name)),
            Self::Message => natural_cmp(&message_text(a), &message_text(b)),
            Self::Status => natural_cmp(a.status.as_str(), b.status.as_str()),
            Self::Total => a.total.cmp(&b.total),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("invalid sort key: {s}"))
    }
}

fn message_text(order: &NormalizedOrder) -> String {
    format!("{} {}", order.notes, order.observation)
        .trim()
        .to_string()
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            _ => Err(format!("invalid sort direction: {s}")),
        }
    }
}

/// The active table sort, with header-click semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// A fresh sort on `key` in its default direction.
    #[must_use]
    pub const fn new(key: SortKey) -> Self {
        Self {
            key,
            direction: key.default_direction(),
        }
    }

    /// The state after the user selects `key`: the same key flips direction,
    /// a different key starts over in that key's default direction.
    #[must_use]
    pub const fn select(self, key: SortKey) -> Self {
        if self.key as u8 == key as u8 {
            Self {
                key,
                direction: self.direction.toggled(),
            }
        } else {
            Self::new(key)
        }
    }

    /// Apply this sort to `orders`.
    #[must_use]
    pub fn apply<'a>(&self, orders: &[&'a NormalizedOrder]) -> Vec<&'a NormalizedOrder> {
        sort_by(orders, self.key, self.direction)
    }
}

/// Sort `orders` by a table column. The sort is stable.
#[must_use]
pub fn sort_by<'a>(
    orders: &[&'a NormalizedOrder],
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a NormalizedOrder> {
    let mut sorted = orders.to_vec();
    sorted.sort_by(|a, b| direction.apply(key.compare(a, b)));
    sorted
}
