//! HTTP client for the WooCommerce `orders` endpoint.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use floresta_core::{NormalizedOrder, RawOrder, normalize_all};

use super::{FetchWindow, MAX_PAGES, WooError};
use crate::config::WooConfig;

/// Response header carrying the page count.
const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Longest error body kept in [`WooError::Api`].
const MAX_ERROR_BODY: usize = 200;

/// WooCommerce orders client.
///
/// Read-only: it lists orders for a creation-date window and never writes.
/// Cheap to clone.
#[derive(Clone)]
pub struct WooClient {
    inner: Arc<WooClientInner>,
}

struct WooClientInner {
    client: reqwest::Client,
    orders_url: Url,
    consumer_key: SecretString,
    consumer_secret: SecretString,
    per_page: u32,
}

/// One fetched page.
struct Page {
    orders: Vec<RawOrder>,
    total_pages: Option<u32>,
}

impl WooClient {
    /// Create a new orders client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL cannot take query parameters or the
    /// HTTP client fails to build.
    pub fn new(config: &WooConfig) -> Result<Self, WooError> {
        if config.orders_url.cannot_be_a_base() {
            return Err(WooError::InvalidUrl(config.orders_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(WooClientInner {
                client,
                orders_url: config.orders_url.clone(),
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.clone(),
                per_page: config.per_page,
            }),
        })
    }

    /// Fetch every order created inside `window`.
    ///
    /// Pages are requested in order until the page count reported by the API
    /// is reached. Without a page-count header, a page shorter than
    /// `per_page` is the last one. No request is retried.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success status or unparseable page fails
    /// the whole fetch. Returns [`WooError::Pagination`] if more than
    /// [`MAX_PAGES`] pages would be requested.
    #[instrument(skip(self), fields(month = %window.month_key()))]
    pub async fn fetch_orders(&self, window: FetchWindow) -> Result<Vec<RawOrder>, WooError> {
        let mut orders = Vec::new();
        let mut page: u32 = 1;
        let mut total_pages: u32 = 1;

        while page <= total_pages {
            if page > MAX_PAGES {
                tracing::warn!(total_pages, "Order pagination exceeded page ceiling");
                return Err(WooError::Pagination(MAX_PAGES));
            }

            let fetched = self.fetch_page(window, page).await?;
            let count = fetched.orders.len();
            orders.extend(fetched.orders);

            total_pages = next_total_pages(fetched.total_pages, page, count, self.inner.per_page);
            tracing::debug!(page, count, total_pages, "Fetched order page");
            page += 1;
        }

        tracing::info!(pages = page - 1, orders = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Fetch and normalize every order created inside `window`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_orders`].
    pub async fn fetch_normalized(
        &self,
        window: FetchWindow,
    ) -> Result<Vec<NormalizedOrder>, WooError> {
        let raw = self.fetch_orders(window).await?;
        Ok(normalize_all(&raw))
    }

    /// Build the request URL for one page.
    fn page_url(&self, window: FetchWindow, page: u32) -> Url {
        let mut url = self.inner.orders_url.clone();
        url.query_pairs_mut()
            .append_pair("per_page", &self.inner.per_page.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("after", &FetchWindow::format_bound(window.after))
            .append_pair("before", &FetchWindow::format_bound(window.before))
            .append_pair("date_column", "date_created");
        url
    }

    async fn fetch_page(&self, window: FetchWindow, page: u32) -> Result<Page, WooError> {
        let response = self
            .inner
            .client
            .get(self.page_url(window, page))
            .basic_auth(
                self.inner.consumer_key.expose_secret(),
                Some(self.inner.consumer_secret.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY).collect()
            };
            tracing::error!(status = status.as_u16(), page, "Order request failed");
            return Err(WooError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .map(|value| parse_total_pages(value.to_str().unwrap_or_default()));

        let orders = response
            .json::<Vec<RawOrder>>()
            .await
            .map_err(|e| WooError::Parse(format!("Failed to parse orders page {page}: {e}")))?;

        Ok(Page {
            orders,
            total_pages,
        })
    }
}

/// Page count from the header value; anything non-numeric or zero counts as
/// a single page.
fn parse_total_pages(value: &str) -> u32 {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&pages| pages > 0)
        .unwrap_or(1)
}

/// The page count to use after fetching `page`.
const fn next_total_pages(header: Option<u32>, page: u32, count: usize, per_page: u32) -> u32 {
    match header {
        Some(pages) => pages,
        None if count < per_page as usize => page,
        None => page + 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(url: &str) -> WooClient {
        WooClient::new(&WooConfig {
            orders_url: Url::parse(url).unwrap(),
            consumer_key: SecretString::from("ck_test"),
            consumer_secret: SecretString::from("cs_test"),
            per_page: 100,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_total_pages() {
        assert_eq!(parse_total_pages("3"), 3);
        assert_eq!(parse_total_pages(" 2 "), 2);
        assert_eq!(parse_total_pages("0"), 1);
        assert_eq!(parse_total_pages("abc"), 1);
        assert_eq!(parse_total_pages(""), 1);
    }

    #[test]
    fn test_next_total_pages() {
        assert_eq!(next_total_pages(Some(4), 1, 100, 100), 4);
        assert_eq!(next_total_pages(Some(1), 3, 100, 100), 1);
        assert_eq!(next_total_pages(None, 2, 37, 100), 2);
        assert_eq!(next_total_pages(None, 2, 100, 100), 3);
        assert_eq!(next_total_pages(None, 1, 0, 100), 1);
    }

    #[test]
    fn test_page_url_carries_window_and_paging() {
        let client = client("https://shop.test/wp-json/wc/v3/orders");
        let window = FetchWindow::month(2024, 1).unwrap();
        let url = client.page_url(window, 2);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("per_page"), "100");
        assert_eq!(get("page"), "2");
        assert_eq!(get("after"), "2024-01-01T00:00:00");
        assert_eq!(get("before"), "2024-02-01T00:00:00");
        assert_eq!(get("date_column"), "date_created");
        assert!(!url.as_str().contains("consumer_key"));
    }

    #[test]
    fn test_new_rejects_non_base_url() {
        let result = WooClient::new(&WooConfig {
            orders_url: Url::parse("mailto:orders@shop.test").unwrap(),
            consumer_key: SecretString::from("ck_test"),
            consumer_secret: SecretString::from("cs_test"),
            per_page: 100,
            timeout: Duration::from_secs(5),
        });
        assert!(matches!(result, Err(WooError::InvalidUrl(_))));
    }
}
