//! Integration tests for La Floresta orders.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p floresta-integration-tests
//! ```
//!
//! No external services are needed: [`MockOrderApi`] serves canned order
//! pages from an in-process axum server on a random loopback port, and the
//! tests point the real `WooClient` and dashboard router at it.
//!
//! # Test Categories
//!
//! - `order_fetch` - pagination, error statuses and the page ceiling
//! - `dashboard` - the orders page and health check through the router

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use floresta_dashboard::{AppState, DashboardConfig, WooConfig};

/// How the mock answers order page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Serve the pages and send `X-WP-TotalPages`.
    TotalPagesHeader,
    /// Serve the pages without the header; an empty page past the end.
    NoHeader,
    /// Every page repeats the first one, with no header.
    Endless,
    /// Every request fails with this status.
    Status(u16),
}

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    pages: Arc<Vec<Vec<Value>>>,
    behaviour: Behaviour,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// An in-process stand-in for the WooCommerce orders endpoint.
pub struct MockOrderApi {
    /// Orders endpoint URL.
    pub url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockOrderApi {
    /// Start serving `pages` (page 1 first).
    ///
    /// # Panics
    ///
    /// Panics if the loopback listener cannot be bound.
    pub async fn start(pages: Vec<Vec<Value>>, behaviour: Behaviour) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            pages: Arc::new(pages),
            behaviour,
            requests: Arc::clone(&requests),
        };
        let router = Router::new()
            .route("/wp-json/wc/v3/orders", get(orders))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind mock order API");
        let addr = listener.local_addr().expect("Mock listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let url = Url::parse(&format!("http://{addr}/wp-json/wc/v3/orders"))
            .expect("Mock URL is valid");
        Self { url, requests }
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Client settings pointing at this mock.
    #[must_use]
    pub fn woo_config(&self, per_page: u32) -> WooConfig {
        WooConfig {
            orders_url: self.url.clone(),
            consumer_key: SecretString::from("ck_4f9a1c7e2b8d3f6a0e5c9b1d7a3f8e2c"),
            consumer_secret: SecretString::from("cs_9e2b7d4a1f8c3e6b0a5d2f9c7e1b4a8d"),
            per_page,
            timeout: Duration::from_secs(5),
        }
    }

    /// Dashboard state whose order client points at this mock.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn app_state(&self, per_page: u32) -> AppState {
        AppState::new(&DashboardConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            woo: self.woo_config(per_page),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        })
        .expect("Failed to build dashboard state")
    }
}

async fn orders(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            query,
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }

    let page_orders = |index: usize| {
        state
            .pages
            .get(index)
            .cloned()
            .unwrap_or_default()
    };

    match state.behaviour {
        Behaviour::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({ "code": "woocommerce_rest_error", "message": "Mock failure" })),
            )
                .into_response()
        }
        Behaviour::TotalPagesHeader => {
            let mut response = Json(page_orders(page.saturating_sub(1))).into_response();
            if let Ok(value) = HeaderValue::from_str(&state.pages.len().to_string()) {
                response.headers_mut().insert("X-WP-TotalPages", value);
            }
            response
        }
        Behaviour::NoHeader => Json(page_orders(page.saturating_sub(1))).into_response(),
        Behaviour::Endless => Json(page_orders(0)).into_response(),
    }
}

/// A raw order record as the orders endpoint returns it.
#[must_use]
pub fn order_json(id: i64, status: &str, total: &str, method: &str, date_label: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "total": total,
        "currency": "CLP",
        "date_created": "2024-01-05T10:30:00",
        "billing": {
            "first_name": format!("Cliente{id}"),
            "last_name": "Prueba",
            "phone": "+56 9 1234 5678",
            "email": format!("cliente{id}@correo.cl")
        },
        "shipping": {
            "first_name": "Destinatario",
            "last_name": format!("{id}"),
            "address_1": "Av. Providencia 1234"
        },
        "line_items": [
            { "id": id * 10, "name": "Ramo de temporada", "quantity": 1 }
        ],
        "shipping_lines": [
            { "method_title": method, "total": "0" }
        ],
        "meta_data": [
            { "id": 1, "key": "Fecha de envío o retiro", "value": date_label },
            { "id": 2, "key": "Horario de entrega", "value": "10:00 - 13:00" },
            { "id": 3, "key": "shipping_mensaje", "value": "Feliz cumpleaños" },
            { "id": 4, "key": "shipping_telefono", "value": null },
            { "id": 5, "key": "_shipping_telefono", "value": 56987654321_i64 }
        ]
    })
}
