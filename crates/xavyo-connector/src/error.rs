//! Connector Framework error types
//!
//! Error definitions with transient/permanent classification so the sync
//! engine knows which failures to back off and retry.

use thiserror::Error;

use crate::annotations::RateLimitDescription;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Connection errors (usually transient)
    /// Network error during communication.
    #[error("network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request did not complete before its deadline.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    /// Target system is temporarily unavailable.
    #[error("target system unavailable: {message}")]
    TargetUnavailable { message: String },

    /// Target system rejected the call because a rate limit was hit.
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        rate_limit: Option<RateLimitDescription>,
    },

    // Target system errors (permanent)
    /// The target API reported a failure code.
    #[error("api error {code}: {message}")]
    ApiError { code: i64, message: String },

    // Configuration errors (permanent)
    /// Connector configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Connector validation against the target system failed.
    #[error("validation failed: {message}")]
    ValidationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Model errors
    /// A resource, entitlement or grant could not be constructed.
    #[error("invalid resource: {message}")]
    InvalidResource { message: String },

    /// A target record could not be mapped to a resource.
    #[error("invalid mapping: {message}")]
    InvalidMapping { message: String },

    /// Invalid data format.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Check if this error is transient and the operation should be retried.
    ///
    /// Transient errors are those caused by temporary conditions that may resolve
    /// themselves, such as network issues, throttling or temporary unavailability.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::NetworkError { .. }
            | ConnectorError::ConnectionTimeout { .. }
            | ConnectorError::TargetUnavailable { .. }
            | ConnectorError::RateLimited { .. } => true,
            ConnectorError::ValidationFailed {
                source: Some(source),
                ..
            } => source
                .downcast_ref::<ConnectorError>()
                .is_some_and(ConnectorError::is_transient),
            _ => false,
        }
    }

    /// Check if this error is permanent and retry won't help.
    ///
    /// Permanent errors require human intervention or configuration changes.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Rate-limit descriptor reported by the target system, if any.
    pub fn rate_limit(&self) -> Option<&RateLimitDescription> {
        match self {
            ConnectorError::RateLimited { rate_limit, .. } => rate_limit.as_ref(),
            _ => None,
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::NetworkError { .. } => "NETWORK_ERROR",
            ConnectorError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            ConnectorError::TargetUnavailable { .. } => "TARGET_UNAVAILABLE",
            ConnectorError::RateLimited { .. } => "RATE_LIMITED",
            ConnectorError::ApiError { .. } => "API_ERROR",
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ConnectorError::InvalidResource { .. } => "INVALID_RESOURCE",
            ConnectorError::InvalidMapping { .. } => "INVALID_MAPPING",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    // Convenience constructors

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invalid resource error.
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        ConnectorError::InvalidResource {
            message: message.into(),
        }
    }

    /// Create an invalid mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        ConnectorError::InvalidMapping {
            message: message.into(),
        }
    }

    /// Create a validation failed error with source.
    pub fn validation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ValidationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
