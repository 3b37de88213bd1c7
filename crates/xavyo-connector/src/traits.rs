//! Connector Framework traits
//!
//! The contract between a connector and the sync engine. A connector exposes
//! one [`ResourceSyncer`] per resource type; the engine walks each syncer's
//! resources, entitlements and grants, following page tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::annotations::Annotations;
use crate::entitlement::Entitlement;
use crate::error::ConnectorResult;
use crate::grant::Grant;
use crate::pagination::{Page, PageToken};
use crate::resource::{Resource, ResourceId, ResourceType};

/// Descriptive metadata about a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMetadata {
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Get the display name for this connector instance.
    fn display_name(&self) -> &str;

    /// Describe the connector to the platform.
    async fn metadata(&self) -> ConnectorResult<ConnectorMetadata>;

    /// Check credentials and connectivity against the target system.
    ///
    /// Returns annotations describing the call (e.g., rate-limit state), or an
    /// error describing what went wrong.
    async fn validate(&self) -> ConnectorResult<Annotations>;

    /// The syncers for every resource type this connector exposes.
    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>>;
}

/// Sync capability for a single resource type.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer produces.
    fn resource_type(&self) -> &ResourceType;

    /// List resources of this type, optionally scoped to a parent.
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        token: &PageToken,
    ) -> ConnectorResult<Page<Resource>>;

    /// List the entitlements defined on `resource`.
    async fn entitlements(
        &self,
        resource: &Resource,
        token: &PageToken,
    ) -> ConnectorResult<Page<Entitlement>>;

    /// List the grants of entitlements on `resource`.
    async fn grants(&self, resource: &Resource, token: &PageToken)
        -> ConnectorResult<Page<Grant>>;
}
