//! Unified error handling for the dashboard.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::woocommerce::WooError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order fetch failed.
    #[error("WooCommerce error: {0}")]
    WooCommerce(#[from] WooError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::WooCommerce(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to users.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::WooCommerce(e) => e.user_message(),
            Self::BadRequest(_) => self.to_string(),
            Self::Internal(_) => "Error interno del servidor".to_string(),
        }
    }

    /// Report server-side failures to Sentry and the log.
    pub fn report(&self) {
        if matches!(self, Self::WooCommerce(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}
