//! Syncer for Expensify policies.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use xavyo_connector::annotations::Annotations;
use xavyo_connector::entitlement::Entitlement;
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::grant::Grant;
use xavyo_connector::pagination::{Page, PageToken};
use xavyo_connector::resource::{Resource, ResourceId, ResourceType};
use xavyo_connector::traits::ResourceSyncer;

use crate::client::ExpensifyClient;
use crate::mapping::{policy_entitlements, policy_grants, policy_resource, resource_type_policy};

/// Lists policies and the role grants held on them.
///
/// The client drains Expensify's own pagination, so every page returned
/// here is terminal.
#[derive(Debug)]
pub struct PolicySyncer {
    resource_type: ResourceType,
    client: Arc<ExpensifyClient>,
}

impl PolicySyncer {
    pub fn new(client: Arc<ExpensifyClient>) -> Self {
        Self {
            resource_type: resource_type_policy(),
            client,
        }
    }
}

#[async_trait]
impl ResourceSyncer for PolicySyncer {
    fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    #[instrument(skip(self, _parent, _token))]
    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        _token: &PageToken,
    ) -> ConnectorResult<Page<Resource>> {
        let response = self.client.list_policies().await?;

        let resources = response
            .data
            .iter()
            .map(policy_resource)
            .collect::<ConnectorResult<Vec<_>>>()?;

        Ok(Page::last(resources)
            .with_annotations(Annotations::new().with_rate_limit(response.rate_limit)))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _token: &PageToken,
    ) -> ConnectorResult<Page<Entitlement>> {
        Ok(Page::last(policy_entitlements(resource)?))
    }

    #[instrument(skip(self, resource, _token), fields(policy_id = %resource.id.resource))]
    async fn grants(&self, resource: &Resource, _token: &PageToken) -> ConnectorResult<Page<Grant>> {
        let response = self
            .client
            .list_policy_employees(&resource.id.resource)
            .await?;

        let grants = policy_grants(resource, &response.data)?;
        debug!(count = grants.len(), "Mapped policy grants");

        Ok(Page::last(grants)
            .with_annotations(Annotations::new().with_rate_limit(response.rate_limit)))
    }
}
