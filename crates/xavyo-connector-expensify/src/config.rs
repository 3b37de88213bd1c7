//! Expensify connector configuration.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use xavyo_connector::config::{ConfigField, ConnectionSettings, ConnectorConfig, REDACTED};
use xavyo_connector::error::{ConnectorError, ConnectorResult};

/// Single endpoint of the Expensify Integration Server.
pub const DEFAULT_BASE_URL: &str =
    "https://integrations.expensify.com/Integration-Server/ExpensifyIntegrations";

const PARTNER_USER_ID_FIELD: ConfigField = ConfigField {
    name: "expensify_user_id",
    env_var: "BATON_PARTNER_USER_ID",
    display_name: "User ID",
    description: "The Expensify partner user id used to connect to the Expensify API.",
    secret: true,
    required: true,
};

const PARTNER_USER_SECRET_FIELD: ConfigField = ConfigField {
    name: "expensify_user_secret",
    env_var: "BATON_PARTNER_USER_SECRET",
    display_name: "User Secret",
    description: "The Expensify partner user secret used to connect to the Expensify API.",
    secret: true,
    required: true,
};

const FIELDS: &[ConfigField] = &[PARTNER_USER_ID_FIELD, PARTNER_USER_SECRET_FIELD];

/// Configuration for the Expensify connector.
///
/// The partner credentials are a static pair injected into every request
/// body; there is no token exchange or expiry.
#[derive(Debug)]
pub struct ExpensifyConfig {
    /// Partner user id.
    pub partner_user_id: String,
    /// Partner user secret.
    pub partner_user_secret: SecretString,
    /// Integration Server endpoint.
    pub base_url: String,
    /// Timeouts applied to every request.
    pub connection: ConnectionSettings,
}

impl ExpensifyConfig {
    /// Create a config with the given partner credentials and default endpoint.
    pub fn new(partner_user_id: impl Into<String>, partner_user_secret: impl Into<String>) -> Self {
        Self {
            partner_user_id: partner_user_id.into(),
            partner_user_secret: SecretString::from(partner_user_secret.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            connection: ConnectionSettings::default(),
        }
    }

    /// Read the partner credentials from `BATON_PARTNER_USER_ID` and
    /// `BATON_PARTNER_USER_SECRET`.
    ///
    /// Missing variables yield empty values, which `validate` rejects.
    pub fn from_env() -> Self {
        Self::from_lookup(|field| std::env::var(field.env_var).ok())
    }

    /// Read the partner credentials from platform settings keyed by field name
    /// (`expensify_user_id`, `expensify_user_secret`).
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        Self::from_lookup(|field| settings.get(field.name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&ConfigField) -> Option<String>) -> Self {
        Self::new(
            lookup(&PARTNER_USER_ID_FIELD).unwrap_or_default(),
            lookup(&PARTNER_USER_SECRET_FIELD).unwrap_or_default(),
        )
    }

    /// Point the connector at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set connection timeouts.
    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }
}

impl ConnectorConfig for ExpensifyConfig {
    fn validate(&self) -> ConnectorResult<()> {
        if self.partner_user_id.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "partner user id is missing",
            ));
        }

        if self.partner_user_secret.expose_secret().trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "partner user secret is missing",
            ));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ConnectorError::invalid_configuration(format!("invalid base_url: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConnectorError::invalid_configuration(format!(
                "base_url scheme '{}' not allowed; only HTTP(S) permitted",
                url.scheme()
            )));
        }

        Ok(())
    }

    fn fields() -> &'static [ConfigField] {
        FIELDS
    }

    fn redacted_summary(&self) -> String {
        format!(
            "partner_user_id={} partner_user_secret={} base_url={}",
            REDACTED, REDACTED, self.base_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ExpensifyConfig::new("partner-id", "partner-secret");
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_partner_user_id() {
        let err = ExpensifyConfig::new("", "partner-secret")
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: partner user id is missing"
        );
    }

    #[test]
    fn test_missing_partner_user_secret() {
        let err = ExpensifyConfig::new("partner-id", "  ")
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: partner user secret is missing"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ExpensifyConfig::new("id", "secret").with_base_url("not a url");
        assert!(config.validate().is_err());

        let config = ExpensifyConfig::new("id", "secret").with_base_url("ftp://example.com/x");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = HashMap::from([
            ("expensify_user_id".to_string(), "partner-id".to_string()),
            ("expensify_user_secret".to_string(), "partner-secret".to_string()),
        ]);

        let config = ExpensifyConfig::from_settings(&settings);
        assert_eq!(config.partner_user_id, "partner-id");
        assert_eq!(config.partner_user_secret.expose_secret(), "partner-secret");
    }

    #[test]
    fn test_from_settings_missing_secret_fails_validation() {
        let settings = HashMap::from([("expensify_user_id".to_string(), "partner-id".to_string())]);
        assert!(ExpensifyConfig::from_settings(&settings).validate().is_err());
    }

    #[test]
    fn test_fields_are_secret_and_required() {
        let fields = ExpensifyConfig::fields();
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.secret && f.required));
        assert_eq!(fields[0].display_name, "User ID");
        assert_eq!(fields[1].env_var, "BATON_PARTNER_USER_SECRET");
    }

    #[test]
    fn test_secret_never_printed() {
        let config = ExpensifyConfig::new("partner-id", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
        assert!(!config.redacted_summary().contains("hunter2"));
        assert!(!config.redacted_summary().contains("partner-id"));
    }
}
