//! Expensify connector facade.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use xavyo_connector::annotations::Annotations;
use xavyo_connector::config::ConnectorConfig;
use xavyo_connector::error::{ConnectorError, ConnectorResult};
use xavyo_connector::traits::{Connector, ConnectorMetadata, ResourceSyncer};

use crate::client::ExpensifyClient;
use crate::config::ExpensifyConfig;
use crate::policies::PolicySyncer;
use crate::users::UserSyncer;

const DISPLAY_NAME: &str = "Expensify";

/// Expensify connector.
///
/// Syncs expense policies and their employees. Each employee's role on a
/// policy becomes a grant of the matching policy entitlement.
#[derive(Debug)]
pub struct ExpensifyConnector {
    client: Arc<ExpensifyClient>,
}

impl ExpensifyConnector {
    /// Create a new Expensify connector with the given configuration.
    pub fn new(config: ExpensifyConfig) -> ConnectorResult<Self> {
        config.validate()?;
        info!(config = %config.redacted_summary(), "Creating Expensify connector");

        let client = ExpensifyClient::new(config)?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Connector for ExpensifyConnector {
    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    async fn metadata(&self) -> ConnectorResult<ConnectorMetadata> {
        Ok(ConnectorMetadata {
            display_name: DISPLAY_NAME.to_string(),
            description: "Syncs Expensify policies, employees and policy roles".to_string(),
        })
    }

    /// Lists policies once to prove the partner credentials work.
    #[instrument(skip(self))]
    async fn validate(&self) -> ConnectorResult<Annotations> {
        let response = self.client.list_policies().await.map_err(|e| {
            let err = ConnectorError::from(e);
            ConnectorError::validation_failed_with_source(
                format!("expensify-connector: {err}"),
                err,
            )
        })?;

        debug!(policies = response.data.len(), "Expensify credentials validated");
        Ok(Annotations::new().with_rate_limit(response.rate_limit))
    }

    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(UserSyncer::new(Arc::clone(&self.client))),
            Arc::new(PolicySyncer::new(Arc::clone(&self.client))),
        ]
    }
}
