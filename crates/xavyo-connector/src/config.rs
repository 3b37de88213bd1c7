//! Connector Framework configuration types
//!
//! Base trait and common configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConnectorResult;

/// Trait for connector-specific configuration.
///
/// Each connector implements this trait to declare its configuration schema
/// and validation rules.
pub trait ConnectorConfig: Send + Sync {
    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid. A connector must not
    /// start with a configuration that fails validation.
    fn validate(&self) -> ConnectorResult<()>;

    /// Declarative description of the settings this connector accepts.
    fn fields() -> &'static [ConfigField]
    where
        Self: Sized;

    /// One-line description safe for logs (secrets replaced by placeholders).
    fn redacted_summary(&self) -> String;
}

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    /// Setting name as stored by the platform.
    pub name: &'static str,
    /// Environment variable the setting may be read from.
    pub env_var: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Whether the value must be hidden in logs and UIs.
    pub secret: bool,
    pub required: bool,
}

/// Placeholder substituted for secret values.
pub const REDACTED: &str = "***REDACTED***";

/// Common connection settings shared across connector types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Total deadline in seconds for one request, from connect until the
    /// body has been read.
    #[serde(default = "default_request_timeout", alias = "read_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connection_timeout_secs: default_connection_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Create new connection settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    pub fn with_connection_timeout(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set the total request deadline.
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Get connection timeout as Duration.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get the total request deadline as Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_settings_defaults() {
        let settings = ConnectionSettings::default();
        assert_eq!(settings.connection_timeout_secs, 30);
        assert_eq!(settings.request_timeout_secs, 60);
    }

    #[test]
    fn test_connection_settings_builder() {
        let settings = ConnectionSettings::new()
            .with_connection_timeout(5)
            .with_request_timeout(10);

        assert_eq!(settings.connection_timeout(), Duration::from_secs(5));
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_connection_settings_serde_defaults() {
        let settings: ConnectionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ConnectionSettings::default());
    }

    #[test]
    fn test_connection_settings_accepts_read_timeout_name() {
        let settings: ConnectionSettings =
            serde_json::from_str(r#"{"read_timeout_secs": 7}"#).unwrap();
        assert_eq!(settings.request_timeout_secs, 7);
        assert_eq!(settings.connection_timeout_secs, 30);
    }
}
