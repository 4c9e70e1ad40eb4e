//! Order counts and amounts split by fulfillment type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::NormalizedOrder;

/// Totals over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub order_count: usize,
    pub total_amount: Decimal,
    pub delivery_count: usize,
    pub delivery_amount: Decimal,
    pub pickup_count: usize,
    pub pickup_amount: Decimal,
    /// Orders whose total could not be parsed; they add zero to every amount.
    pub unpriced_count: usize,
}

impl Metrics {
    /// Mean order total, or zero for an empty set.
    #[must_use]
    pub fn average_ticket(&self) -> Decimal {
        if self.order_count == 0 {
            return Decimal::ZERO;
        }
        self.total_amount
            .checked_div(Decimal::from(self.order_count))
            .unwrap_or(Decimal::ZERO)
    }

    /// Amounts saturate at the `Decimal` bounds instead of overflowing.
    fn add(&mut self, order: &NormalizedOrder) {
        let amount = order.total_or_zero();
        self.order_count += 1;
        self.total_amount = self.total_amount.saturating_add(amount);
        if order.total.is_none() {
            self.unpriced_count += 1;
        }
        if order.is_pickup {
            self.pickup_count += 1;
            self.pickup_amount = self.pickup_amount.saturating_add(amount);
        } else {
            self.delivery_count += 1;
            self.delivery_amount = self.delivery_amount.saturating_add(amount);
        }
    }
}

/// Summarize `orders` in a single pass.
#[must_use]
pub fn summarize<'a, I>(orders: I) -> Metrics
where
    I: IntoIterator<Item = &'a NormalizedOrder>,
{
    orders.into_iter().fold(Metrics::default(), |mut metrics, order| {
        metrics.add(order);
        metrics
    })
}
