//! Query parameters and view types for the orders page.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use floresta_core::calendar::{default_day, group_by_day, initial_month, month_grid, shift_month};
use floresta_core::date::to_iso_day;
use floresta_core::query::{FulfillmentFilter, OrderFilters, SortDirection, SortKey, SortState, StatusFilter};
use floresta_core::{Metrics, NormalizedOrder, OrderStatus};

use crate::error::AppError;
use crate::filters::{format_clp, month_title, status_label};

pub const NO_ADDRESS: &str = "Sin dirección de envío registrada.";
pub const PICKUP_ADDRESS: &str = "No aplica (retiro en local).";
pub const NO_MESSAGE: &str = "Sin mensaje";
pub const NO_OBSERVATION: &str = "Sin observaciones";
pub const NO_TOTAL: &str = "Sin total";

/// Orders page query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
    /// Status code, or `all`.
    pub status: Option<String>,
    /// `all`, `delivery` or `pickup`.
    pub logistics: Option<String>,
    /// Free-text search query.
    pub q: Option<String>,
    /// `table` or `calendar`.
    pub view: Option<String>,
    /// Sort column key.
    pub sort: Option<String>,
    /// Sort direction (asc/desc).
    pub dir: Option<String>,
    /// Fetch window month (`YYYY-MM`).
    pub month: Option<String>,
    /// Calendar month cursor (`YYYY-MM`).
    pub cal: Option<String>,
    /// Selected calendar day (`YYYY-MM-DD`).
    pub day: Option<String>,
}

/// Which main view is shown below the cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Table,
    Calendar,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Calendar => "calendar",
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl OrdersQuery {
    /// Filter criteria from the form fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown logistics value.
    pub fn filters(&self) -> Result<OrderFilters, AppError> {
        let fulfillment = non_empty(self.logistics.as_ref())
            .map_or(Ok(FulfillmentFilter::All), str::parse)
            .map_err(AppError::BadRequest)?;
        Ok(OrderFilters {
            status: StatusFilter::parse(non_empty(self.status.as_ref()).unwrap_or_default()),
            fulfillment,
            search: self.q.clone().unwrap_or_default(),
        })
    }

    /// Requested view; anything but `calendar` is the table.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        match non_empty(self.view.as_ref()) {
            Some("calendar") => ViewMode::Calendar,
            _ => ViewMode::Table,
        }
    }

    /// Requested table sort, if any.
    ///
    /// A missing direction means the key's default direction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown sort key or direction.
    pub fn sort_state(&self) -> Result<Option<SortState>, AppError> {
        let Some(key) = non_empty(self.sort.as_ref()) else {
            return Ok(None);
        };
        let key: SortKey = key.parse().map_err(AppError::BadRequest)?;
        let direction = match non_empty(self.dir.as_ref()) {
            Some(dir) => dir.parse::<SortDirection>().map_err(AppError::BadRequest)?,
            None => key.default_direction(),
        };
        Ok(Some(SortState { key, direction }))
    }

    /// Calendar month cursor, if given and valid.
    #[must_use]
    pub fn calendar_month(&self) -> Option<NaiveDate> {
        let (year, month) = non_empty(self.cal.as_ref())?.split_once('-')?;
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    }

    /// Selected calendar day, if given and a real date.
    #[must_use]
    pub fn selected_day(&self) -> Option<String> {
        let day = non_empty(self.day.as_ref())?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .ok()
            .map(|date| to_iso_day(&date))
    }

    /// Filter parameters to preserve across links, URL-encoded.
    ///
    /// View, sort and calendar parameters are excluded; each link sets its own.
    #[must_use]
    pub fn preserve_params(&self) -> String {
        let mut params = Vec::new();
        for (name, value) in [
            ("status", &self.status),
            ("logistics", &self.logistics),
            ("q", &self.q),
            ("month", &self.month),
        ] {
            if let Some(value) = non_empty(value.as_ref()) {
                params.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }
        params.join("&")
    }

    /// `/orders?<preserved>&` ready for more parameters.
    #[must_use]
    pub fn base_href(&self) -> String {
        let preserved = self.preserve_params();
        if preserved.is_empty() {
            "/orders?".to_string()
        } else {
            format!("/orders?{preserved}&")
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// A select option.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Status options: "Todos" plus every status present in `statuses`.
#[must_use]
pub fn status_options(statuses: &[OrderStatus], current: &StatusFilter) -> Vec<OptionView> {
    let mut options = vec![OptionView::new("all", "Todos", *current == StatusFilter::All)];
    options.extend(statuses.iter().map(|status| {
        OptionView::new(
            status.as_str(),
            status_label(status.as_str()),
            current.as_str() == status.as_str() && *current != StatusFilter::All,
        )
    }));
    options
}

/// Logistics options.
#[must_use]
pub fn logistics_options(current: FulfillmentFilter) -> Vec<OptionView> {
    [
        (FulfillmentFilter::All, "Todos"),
        (FulfillmentFilter::Delivery, "Envío"),
        (FulfillmentFilter::Pickup, "Retiro"),
    ]
    .into_iter()
    .map(|(filter, label)| OptionView::new(filter.as_str(), label, filter == current))
    .collect()
}

/// Metric cards.
#[derive(Debug, Clone)]
pub struct MetricsView {
    pub orders: usize,
    pub orders_amount: String,
    pub deliveries: usize,
    pub deliveries_amount: String,
    pub pickups: usize,
    pub pickups_amount: String,
    pub average_ticket: String,
    pub unpriced: usize,
}

impl From<&Metrics> for MetricsView {
    fn from(metrics: &Metrics) -> Self {
        Self {
            orders: metrics.order_count,
            orders_amount: metrics.total_amount.to_string(),
            deliveries: metrics.delivery_count,
            deliveries_amount: metrics.delivery_amount.to_string(),
            pickups: metrics.pickup_count,
            pickups_amount: metrics.pickup_amount.to_string(),
            average_ticket: metrics.average_ticket().to_string(),
            unpriced: metrics.unpriced_count,
        }
    }
}

/// Logistics badge.
#[derive(Debug, Clone, Copy)]
pub struct LogisticsBadge {
    pub label: &'static str,
    pub title: &'static str,
    pub class: &'static str,
    pub is_pickup: bool,
}

impl LogisticsBadge {
    #[must_use]
    pub const fn new(is_pickup: bool) -> Self {
        if is_pickup {
            Self {
                label: "Retiro",
                title: "Retiro en local",
                class: "bg-violet-100 text-violet-800",
                is_pickup,
            }
        } else {
            Self {
                label: "Envío",
                title: "Envío a domicilio",
                class: "bg-sky-100 text-sky-800",
                is_pickup,
            }
        }
    }
}

/// One order as shown in cards, table rows and the calendar day list.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    /// Raw status code; templates translate it with the status filters.
    pub status: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub logistics: LogisticsBadge,
    pub delivery_type: String,
    pub delivery_date_label: String,
    pub delivery_slot: String,
    /// Address line; only shown for deliveries.
    pub address: String,
    pub notes: String,
    pub observation: String,
    pub total: String,
    /// First two line items.
    pub items_preview: String,
    pub items: String,
}

impl From<&NormalizedOrder> for OrderView {
    fn from(order: &NormalizedOrder) -> Self {
        let address = if order.is_pickup {
            PICKUP_ADDRESS.to_string()
        } else if order.delivery_address.is_empty() {
            NO_ADDRESS.to_string()
        } else {
            order.delivery_address.clone()
        };

        Self {
            id: order.id.to_string(),
            status: order.status.as_str().to_string(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            recipient_name: order.recipient_name.clone(),
            recipient_phone: order.recipient_phone.clone(),
            logistics: LogisticsBadge::new(order.is_pickup),
            delivery_type: order.delivery_type.clone(),
            delivery_date_label: order.delivery_date_label.clone(),
            delivery_slot: order.delivery_slot.clone(),
            address,
            notes: or_fallback(&order.notes, NO_MESSAGE),
            observation: or_fallback(&order.observation, NO_OBSERVATION),
            total: order.total.map_or_else(|| NO_TOTAL.to_string(), format_clp),
            items_preview: order
                .items
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            items: order.items.join(", "),
        }
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone)]
pub struct CalendarDayView {
    pub day: u32,
    pub key: String,
    pub count: usize,
    pub in_month: bool,
    pub selected: bool,
    pub href: String,
}

/// The calendar view: month grid plus the selected day's orders.
#[derive(Debug, Clone)]
pub struct CalendarView {
    pub title: String,
    pub prev_href: String,
    pub next_href: String,
    pub weeks: Vec<Vec<CalendarDayView>>,
    pub selected_day: String,
    pub selected_orders: Vec<OrderView>,
}

fn month_key(month: NaiveDate) -> String {
    format!("{:04}-{:02}", month.year(), month.month())
}

impl CalendarView {
    /// Build the calendar over `orders` (already filtered and sorted).
    #[must_use]
    pub fn build(orders: &[&NormalizedOrder], query: &OrdersQuery, today: NaiveDate) -> Self {
        let grouped: BTreeMap<String, Vec<&NormalizedOrder>> = group_by_day(orders.iter().copied());
        let month = query
            .calendar_month()
            .unwrap_or_else(|| initial_month(orders.iter().copied(), today));
        let selected_day = query
            .selected_day()
            .unwrap_or_else(|| default_day(&grouped, today));

        let base = format!("{}view=calendar", query.base_href());
        let weeks = month_grid(month)
            .chunks(7)
            .map(|week| {
                week.iter()
                    .map(|date| {
                        let key = to_iso_day(date);
                        CalendarDayView {
                            day: date.day(),
                            count: grouped.get(&key).map_or(0, Vec::len),
                            in_month: date.month() == month.month(),
                            selected: key == selected_day,
                            href: format!("{base}&cal={}&day={key}", month_key(month)),
                            key,
                        }
                    })
                    .collect()
            })
            .collect();

        let selected_orders = grouped
            .get(&selected_day)
            .map(|day| day.iter().map(|order| OrderView::from(*order)).collect())
            .unwrap_or_default();

        Self {
            title: month_title(month),
            prev_href: format!(
                "{base}&cal={}&day={selected_day}",
                month_key(shift_month(month, -1))
            ),
            next_href: format!(
                "{base}&cal={}&day={selected_day}",
                month_key(shift_month(month, 1))
            ),
            weeks,
            selected_day,
            selected_orders,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use floresta_core::{MetaEntry, RawOrder, RawShippingLine, normalize};

    fn order(id: i64, method: &str, date_label: &str) -> NormalizedOrder {
        let raw: RawOrder = serde_json::from_value(serde_json::json!({
            "id": id,
            "status": "processing",
            "total": "15990",
        }))
        .unwrap();
        normalize(&RawOrder {
            shipping_lines: vec![RawShippingLine {
                method_title: method.to_string(),
                total: String::new(),
            }],
            meta_data: vec![MetaEntry::text("Fecha de envío o retiro", date_label)],
            ..raw
        })
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filters_from_query() {
        let query = OrdersQuery {
            status: Some("completed".to_string()),
            logistics: Some("pickup".to_string()),
            q: Some("juan".to_string()),
            ..OrdersQuery::default()
        };
        let filters = query.filters().unwrap();
        assert_eq!(filters.status, StatusFilter::Only(OrderStatus::Completed));
        assert_eq!(filters.fulfillment, FulfillmentFilter::Pickup);
        assert_eq!(filters.search, "juan");

        assert_eq!(OrdersQuery::default().filters().unwrap(), OrderFilters::default());
    }

    #[test]
    fn test_invalid_logistics_is_bad_request() {
        let query = OrdersQuery {
            logistics: Some("express".to_string()),
            ..OrdersQuery::default()
        };
        assert!(matches!(query.filters(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_sort_state_defaults_direction() {
        let query = OrdersQuery {
            sort: Some("total".to_string()),
            ..OrdersQuery::default()
        };
        assert_eq!(
            query.sort_state().unwrap(),
            Some(SortState::new(SortKey::Total))
        );
        assert_eq!(OrdersQuery::default().sort_state().unwrap(), None);

        let bad = OrdersQuery {
            sort: Some("price".to_string()),
            ..OrdersQuery::default()
        };
        assert!(bad.sort_state().is_err());
    }

    #[test]
    fn test_preserve_params_encodes_search() {
        let query = OrdersQuery {
            q: Some("juan pérez".to_string()),
            status: Some("all".to_string()),
            sort: Some("id".to_string()),
            ..OrdersQuery::default()
        };
        assert_eq!(query.preserve_params(), "status=all&q=juan%20p%C3%A9rez");
        assert_eq!(query.base_href(), "/orders?status=all&q=juan%20p%C3%A9rez&");
        assert_eq!(OrdersQuery::default().base_href(), "/orders?");
    }

    #[test]
    fn test_selected_day_validates_date() {
        let query = OrdersQuery {
            day: Some("2024-02-30".to_string()),
            ..OrdersQuery::default()
        };
        assert_eq!(query.selected_day(), None);
        let query = OrdersQuery {
            day: Some("2024-02-29".to_string()),
            ..OrdersQuery::default()
        };
        assert_eq!(query.selected_day().as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn test_order_view_fallbacks() {
        let delivery = OrderView::from(&order(1, "Despacho a domicilio", "15 enero 2024"));
        assert_eq!(delivery.address, NO_ADDRESS);
        assert_eq!(delivery.notes, NO_MESSAGE);
        assert_eq!(delivery.observation, NO_OBSERVATION);
        assert_eq!(delivery.total, "$15.990");
        assert_eq!(delivery.logistics.label, "Envío");

        let pickup = OrderView::from(&order(2, "Retiro en tienda", "15 enero 2024"));
        assert_eq!(pickup.address, PICKUP_ADDRESS);
        assert_eq!(pickup.logistics.label, "Retiro");
    }

    #[test]
    fn test_order_view_malformed_total() {
        let mut normalized = order(1, "", "");
        normalized.total = None;
        assert_eq!(OrderView::from(&normalized).total, NO_TOTAL);
        normalized.total = Some(Decimal::new(1_000_000, 0));
        assert_eq!(OrderView::from(&normalized).total, "$1.000.000");
    }

    #[test]
    fn test_status_options_include_seen_statuses() {
        let options = status_options(
            &[OrderStatus::Processing, OrderStatus::Other("wc-custom".to_string())],
            &StatusFilter::parse("wc-custom"),
        );
        assert_eq!(options.len(), 3);
        assert!(!options[0].selected);
        assert_eq!(options[1].label, "En proceso");
        assert_eq!(options[2].label, "wc-custom");
        assert!(options[2].selected);
    }

    #[test]
    fn test_calendar_opens_on_first_dated_order() {
        let orders = [
            order(1, "", "Sin fecha"),
            order(2, "", "20 marzo 2024"),
            order(3, "", "5 marzo 2024"),
        ];
        let refs: Vec<&NormalizedOrder> = orders.iter().collect();
        let calendar = CalendarView::build(&refs, &OrdersQuery::default(), ymd(2024, 6, 1));

        assert_eq!(calendar.title, "marzo de 2024");
        assert_eq!(calendar.selected_day, "2024-03-05");
        assert_eq!(calendar.selected_orders.len(), 1);
        assert!(calendar.weeks.iter().all(|week| week.len() == 7));

        let counted: usize = calendar.weeks.iter().flatten().map(|d| d.count).sum();
        assert_eq!(counted, 2);
    }

    #[test]
    fn test_calendar_respects_cursor_and_day() {
        let orders = [order(1, "", "20 marzo 2024")];
        let refs: Vec<&NormalizedOrder> = orders.iter().collect();
        let query = OrdersQuery {
            cal: Some("2024-04".to_string()),
            day: Some("2024-03-20".to_string()),
            ..OrdersQuery::default()
        };
        let calendar = CalendarView::build(&refs, &query, ymd(2024, 6, 1));

        assert_eq!(calendar.title, "abril de 2024");
        assert_eq!(calendar.selected_orders.len(), 1);
        assert!(calendar.prev_href.contains("cal=2024-03"));
        assert!(calendar.next_href.contains("cal=2024-05"));
    }
}
