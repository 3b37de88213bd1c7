//! Syncer for policy employees.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;
use xavyo_connector::annotations::Annotations;
use xavyo_connector::entitlement::Entitlement;
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::grant::Grant;
use xavyo_connector::pagination::{Page, PageToken};
use xavyo_connector::resource::{Resource, ResourceId, ResourceType};
use xavyo_connector::traits::ResourceSyncer;

use crate::client::ExpensifyClient;
use crate::mapping::{resource_type_user, user_resource, POLICY_RESOURCE_TYPE};

/// Lists the employees of a policy.
///
/// Users only exist under a policy; listing without a policy parent yields
/// nothing. Permissions live on the policy, so users carry no entitlements
/// or grants.
#[derive(Debug)]
pub struct UserSyncer {
    resource_type: ResourceType,
    client: Arc<ExpensifyClient>,
}

impl UserSyncer {
    pub fn new(client: Arc<ExpensifyClient>) -> Self {
        Self {
            resource_type: resource_type_user(),
            client,
        }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    #[instrument(skip(self, _token))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        _token: &PageToken,
    ) -> ConnectorResult<Page<Resource>> {
        let Some(parent) = parent.filter(|p| p.resource_type == POLICY_RESOURCE_TYPE) else {
            return Ok(Page::empty());
        };

        let response = self.client.list_policy_employees(&parent.resource).await?;

        let resources = response
            .data
            .iter()
            .map(|user| user_resource(user, parent))
            .collect::<ConnectorResult<Vec<_>>>()?;

        Ok(Page::last(resources)
            .with_annotations(Annotations::new().with_rate_limit(response.rate_limit)))
    }

    async fn entitlements(
        &self,
        _resource: &Resource,
        _token: &PageToken,
    ) -> ConnectorResult<Page<Entitlement>> {
        Ok(Page::empty())
    }

    async fn grants(&self, _resource: &Resource, _token: &PageToken) -> ConnectorResult<Page<Grant>> {
        Ok(Page::empty())
    }
}
