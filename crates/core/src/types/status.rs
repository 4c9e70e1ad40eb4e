//! Order status codes.
//!
//! WooCommerce reports a status string per order. The seven codes the
//! dashboard knows about get their own variant; anything else (custom
//! statuses added by plugins, future codes) is carried through verbatim so
//! that filtering and display never lose information.

use serde::{Deserialize, Serialize};

/// Order status as received from the order API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Processing,
    Completed,
    Pending,
    Cancelled,
    OnHold,
    Refunded,
    Failed,
    /// Unrecognized code, kept exactly as received.
    Other(String),
}

impl OrderStatus {
    /// The known status codes, in display order.
    pub const KNOWN: [Self; 7] = [
        Self::Processing,
        Self::Completed,
        Self::Pending,
        Self::Cancelled,
        Self::OnHold,
        Self::Refunded,
        Self::Failed,
    ];

    /// Parse a status code. Never fails: unknown codes become [`Self::Other`].
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            "cancelled" => Self::Cancelled,
            "on_hold" => Self::OnHold,
            "refunded" => Self::Refunded,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The exact status code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
            Self::OnHold => "on_hold",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
            Self::Other(code) => code,
        }
    }

    /// Whether this is one of the seven known codes.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<&str> for OrderStatus {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip_through_as_str() {
        for status in OrderStatus::KNOWN {
            assert_eq!(OrderStatus::parse(status.as_str()), status);
            assert!(status.is_known());
        }
    }

    #[test]
    fn test_unknown_code_passes_through() {
        let status = OrderStatus::parse("on-hold");
        assert_eq!(status, OrderStatus::Other("on-hold".to_string()));
        assert_eq!(status.as_str(), "on-hold");
        assert!(!status.is_known());
    }

    #[test]
    fn test_serde_uses_raw_code() {
        let status: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);

        let custom: OrderStatus = serde_json::from_str("\"wc-ready-to-ship\"").unwrap();
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"wc-ready-to-ship\"");
    }
}
