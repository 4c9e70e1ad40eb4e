//! Orders page: metric cards, order cards, table and calendar.

pub mod types;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use tracing::instrument;

use floresta_core::query::{select_and_sort, statuses};
use floresta_core::{NormalizedOrder, summarize};

use crate::{
    components::data_table::{HeaderCell, header_cells, orders_table_columns},
    error::AppError,
    filters,
    state::AppState,
    woocommerce::FetchWindow,
};

pub use types::{
    CalendarDayView, CalendarView, MetricsView, OptionView, OrderView, OrdersQuery, ViewMode,
};

/// Orders page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    /// Fetch window month (`YYYY-MM`).
    pub month: String,
    pub month_title: String,
    pub status_options: Vec<OptionView>,
    pub logistics_options: Vec<OptionView>,
    pub search_value: String,
    pub view: &'static str,
    pub table_href: String,
    pub calendar_href: String,
    pub metrics: MetricsView,
    /// Fetch failure shown instead of the orders.
    pub error: Option<String>,
    pub orders: Vec<OrderView>,
    pub headers: Vec<HeaderCell>,
    pub calendar: Option<CalendarView>,
}

impl OrdersIndexTemplate {
    /// Build the page for already fetched orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for malformed filter or sort parameters.
    pub fn build(
        query: &OrdersQuery,
        window: FetchWindow,
        orders: &[NormalizedOrder],
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let filters = query.filters()?;
        let sort = query.sort_state()?;
        let view = query.view_mode();

        let selected = select_and_sort(orders, &filters);
        let metrics = summarize(selected.iter().copied());
        let rows = sort.map_or_else(|| selected.clone(), |state| state.apply(&selected));

        let base_href = query.base_href();
        let calendar = (view == ViewMode::Calendar)
            .then(|| CalendarView::build(&selected, query, today));

        Ok(Self {
            month: window.month_key(),
            month_title: filters::month_title(window.first_day()),
            status_options: types::status_options(&statuses(orders), &filters.status),
            logistics_options: types::logistics_options(filters.fulfillment),
            search_value: filters.search.clone(),
            view: view.as_str(),
            table_href: format!("{base_href}view=table"),
            calendar_href: format!("{base_href}view=calendar"),
            metrics: MetricsView::from(&metrics),
            error: None,
            orders: rows.iter().map(|order| OrderView::from(*order)).collect(),
            headers: header_cells(&orders_table_columns(), sort, &format!("{base_href}view=table&")),
            calendar,
        })
    }

    /// Build the page for a failed fetch: the message and no orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for malformed filter or sort parameters.
    pub fn failed(
        query: &OrdersQuery,
        window: FetchWindow,
        today: NaiveDate,
        message: String,
    ) -> Result<Self, AppError> {
        let mut page = Self::build(query, window, &[], today)?;
        page.error = Some(message);
        page.calendar = None;
        Ok(page)
    }
}

/// Resolve the fetch window from the `month` parameter.
fn fetch_window(query: &OrdersQuery, today: NaiveDate) -> Result<FetchWindow, AppError> {
    match query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(key) => FetchWindow::parse_month(key)
            .ok_or_else(|| AppError::BadRequest(format!("invalid month: {key}"))),
        None => Ok(FetchWindow::current_month(today)),
    }
}

fn render(status: StatusCode, template: &OrdersIndexTemplate) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => AppError::Internal(format!("template render failed: {e}")).into_response(),
    }
}

/// Orders page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Response, AppError> {
    let today = Local::now().date_naive();
    let window = fetch_window(&query, today)?;
    // Malformed parameters are a 400 whatever the upstream does
    query.filters()?;
    query.sort_state()?;

    match state.woo().fetch_normalized(window).await {
        Ok(orders) => {
            let page = OrdersIndexTemplate::build(&query, window, &orders, today)?;
            Ok(render(StatusCode::OK, &page))
        }
        Err(e) => {
            let error = AppError::from(e);
            error.report();
            let page = OrdersIndexTemplate::failed(&query, window, today, error.public_message())?;
            Ok(render(error.status(), &page))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use floresta_core::{MetaEntry, RawBilling, RawOrder, RawShippingLine, normalize};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(id: i64, status: &str, total: &str, method: &str, first_name: &str) -> NormalizedOrder {
        let raw: RawOrder = serde_json::from_value(serde_json::json!({
            "id": id,
            "status": status,
            "total": total,
        }))
        .unwrap();
        normalize(&RawOrder {
            billing: RawBilling {
                first_name: first_name.to_string(),
                ..RawBilling::default()
            },
            shipping_lines: vec![RawShippingLine {
                method_title: method.to_string(),
                total: String::new(),
            }],
            meta_data: vec![MetaEntry::text("Fecha de envío o retiro", "10 enero 2024")],
            ..raw
        })
    }

    fn sample() -> Vec<NormalizedOrder> {
        vec![
            order(1, "processing", "10000", "Despacho a domicilio", "Juan"),
            order(2, "completed", "20000", "Retiro en tienda", "Juana"),
            order(3, "completed", "30000", "Retiro en tienda", "Pedro"),
        ]
    }

    fn window() -> FetchWindow {
        FetchWindow::month(2024, 1).unwrap()
    }

    #[test]
    fn test_build_applies_filters_and_metrics() {
        let query = OrdersQuery {
            status: Some("completed".to_string()),
            logistics: Some("pickup".to_string()),
            q: Some("juan".to_string()),
            ..OrdersQuery::default()
        };
        let page = OrdersIndexTemplate::build(&query, window(), &sample(), ymd(2024, 1, 20)).unwrap();

        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.orders[0].id, "2");
        assert_eq!(page.metrics.orders, 1);
        assert_eq!(page.metrics.pickups, 1);
        assert!(page.calendar.is_none());
        assert_eq!(page.month, "2024-01");
    }

    #[test]
    fn test_build_applies_table_sort() {
        let query = OrdersQuery {
            sort: Some("total".to_string()),
            ..OrdersQuery::default()
        };
        let page = OrdersIndexTemplate::build(&query, window(), &sample(), ymd(2024, 1, 20)).unwrap();
        let ids: Vec<&str> = page.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);

        let total = page.headers.iter().find(|h| h.label == "Total").unwrap();
        assert!(total.href.ends_with("sort=total&dir=asc"));
    }

    #[test]
    fn test_build_calendar_view() {
        let query = OrdersQuery {
            view: Some("calendar".to_string()),
            ..OrdersQuery::default()
        };
        let page = OrdersIndexTemplate::build(&query, window(), &sample(), ymd(2024, 1, 20)).unwrap();
        let calendar = page.calendar.unwrap();
        assert_eq!(calendar.selected_day, "2024-01-10");
        assert_eq!(calendar.selected_orders.len(), 3);
    }

    #[test]
    fn test_failed_page_has_message_and_no_orders() {
        let page = OrdersIndexTemplate::failed(
            &OrdersQuery::default(),
            window(),
            ymd(2024, 1, 20),
            "No se pudo cargar pedidos (503)".to_string(),
        )
        .unwrap();
        assert!(page.orders.is_empty());
        assert_eq!(page.metrics.orders, 0);

        let html = page.render().unwrap();
        assert!(html.contains("No se pudo cargar pedidos (503)"));
    }

    #[test]
    fn test_rendered_page_shows_labels_and_currency() {
        let page = OrdersIndexTemplate::build(
            &OrdersQuery::default(),
            window(),
            &sample(),
            ymd(2024, 1, 20),
        )
        .unwrap();
        let html = page.render().unwrap();

        assert!(html.contains("En proceso"));
        assert!(html.contains("Completado"));
        assert!(html.contains("$60.000"));
        assert!(html.contains("$20.000"));
        assert!(html.contains("Retiro en local"));
        assert!(html.contains("Sin dirección de envío registrada."));
        assert!(html.contains("enero de 2024"));
    }

    #[test]
    fn test_order_cards_show_items_and_notes() {
        let raw: RawOrder = serde_json::from_value(serde_json::json!({
            "id": 7,
            "status": "processing",
            "total": "25000",
            "line_items": [{"name": "Ramo de peonías", "quantity": 2}],
            "shipping": {"address_1": "Av. Italia 1234"},
            "shipping_lines": [{"method_title": "Despacho a domicilio", "total": "0"}],
            "meta_data": [{"key": "shipping_mensaje", "value": "Feliz cumpleaños"}],
        }))
        .unwrap();
        let page = OrdersIndexTemplate::build(
            &OrdersQuery::default(),
            window(),
            &[normalize(&raw)],
            ymd(2024, 1, 20),
        )
        .unwrap();
        let html = page.render().unwrap();
        let start = html.find("grid gap-3 md:hidden").unwrap();
        let cards = &html[start..start + html[start..].find("</section>").unwrap()];

        assert!(cards.contains("2 x Ramo de peonías"));
        assert!(cards.contains("Feliz cumpleaños"));
        assert!(cards.contains("Sin observaciones"));
        assert!(cards.contains("Av. Italia 1234"));
    }

    #[test]
    fn test_fetch_window_from_query() {
        let today = ymd(2024, 5, 9);
        assert_eq!(
            fetch_window(&OrdersQuery::default(), today).unwrap(),
            FetchWindow::current_month(today)
        );
        let query = OrdersQuery {
            month: Some("2023-12".to_string()),
            ..OrdersQuery::default()
        };
        assert_eq!(fetch_window(&query, today).unwrap().month_key(), "2023-12");
        let query = OrdersQuery {
            month: Some("diciembre".to_string()),
            ..OrdersQuery::default()
        };
        assert!(matches!(fetch_window(&query, today), Err(AppError::BadRequest(_))));
    }
}
