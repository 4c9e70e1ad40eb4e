//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::woocommerce::{WooClient, WooError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    woo: WooClient,
}

impl AppState {
    /// Build the state and its order client.
    ///
    /// # Errors
    ///
    /// Returns error if the WooCommerce client cannot be created.
    pub fn new(config: &DashboardConfig) -> Result<Self, WooError> {
        let woo = WooClient::new(&config.woo)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { woo }),
        })
    }

    #[must_use]
    pub fn woo(&self) -> &WooClient {
        &self.inner.woo
    }
}
