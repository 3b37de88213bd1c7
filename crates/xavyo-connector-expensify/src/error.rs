//! Error types for the Expensify connector.

use thiserror::Error;
use xavyo_connector::annotations::RateLimitDescription;
use xavyo_connector::error::ConnectorError;

/// Result type alias using `ExpensifyError`.
pub type ExpensifyResult<T> = Result<T, ExpensifyError>;

/// Errors that can occur when talking to the Expensify Integration Server.
#[derive(Debug, Error)]
pub enum ExpensifyError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error (connection refused, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured deadline.
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The API answered with a non-success `responseCode`.
    #[error("Expensify API error: {code} - {message}")]
    Api {
        code: i64,
        message: String,
        rate_limit: RateLimitDescription,
    },

    /// HTTP 429.
    #[error("Rate limit exceeded")]
    RateLimited { rate_limit: RateLimitDescription },

    /// HTTP 5xx without an API error payload.
    #[error("Expensify unavailable: HTTP {status}")]
    Unavailable {
        status: u16,
        rate_limit: RateLimitDescription,
    },

    /// Other unexpected HTTP status without an API error payload.
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        status: u16,
        body: String,
        rate_limit: RateLimitDescription,
    },

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The continuation token sequence was inconsistent.
    #[error("Pagination error: {0}")]
    Pagination(String),
}

impl ExpensifyError {
    /// Rate-limit state captured from the failing response, if a response arrived.
    pub fn rate_limit(&self) -> Option<&RateLimitDescription> {
        match self {
            ExpensifyError::Api { rate_limit, .. }
            | ExpensifyError::RateLimited { rate_limit }
            | ExpensifyError::Unavailable { rate_limit, .. }
            | ExpensifyError::Status { rate_limit, .. } => Some(rate_limit),
            _ => None,
        }
    }

    /// Whether the host should back off and retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExpensifyError::Http(_)
                | ExpensifyError::Timeout { .. }
                | ExpensifyError::RateLimited { .. }
                | ExpensifyError::Unavailable { .. }
        )
    }
}

impl From<ExpensifyError> for ConnectorError {
    fn from(err: ExpensifyError) -> Self {
        match err {
            ExpensifyError::Config(message) => ConnectorError::InvalidConfiguration { message },
            ExpensifyError::Http(e) => {
                ConnectorError::network_with_source("request to Expensify failed", e)
            }
            ExpensifyError::Timeout { timeout_secs } => {
                ConnectorError::ConnectionTimeout { timeout_secs }
            }
            ExpensifyError::Api { code, message, .. } => ConnectorError::ApiError { code, message },
            ExpensifyError::RateLimited { rate_limit } => ConnectorError::RateLimited {
                message: "Expensify returned HTTP 429".to_string(),
                rate_limit: Some(rate_limit),
            },
            ExpensifyError::Unavailable { status, .. } => ConnectorError::TargetUnavailable {
                message: format!("Expensify returned HTTP {status}"),
            },
            ExpensifyError::Status { status, body, .. } => ConnectorError::ApiError {
                code: i64::from(status),
                message: body,
            },
            ExpensifyError::Json(e) => ConnectorError::Serialization {
                message: e.to_string(),
            },
            ExpensifyError::Pagination(message) => ConnectorError::InvalidData { message },
        }
    }
}
