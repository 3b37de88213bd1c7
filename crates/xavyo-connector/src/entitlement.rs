//! Entitlements: grantable permissions defined on a resource.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::{Resource, ResourceId, ResourceType};

/// What kind of access an entitlement represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementPurpose {
    /// A permission or role on the resource.
    #[default]
    Permission,
    /// Plain membership in the resource.
    Assignment,
}

/// A grantable permission on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Entitlement id, `type:resource:slug`.
    pub id: String,
    /// Resource the entitlement is defined on.
    pub resource: ResourceId,
    /// Short machine name (e.g., "admin").
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub purpose: EntitlementPurpose,
    /// Resource type ids this entitlement may be granted to.
    #[serde(default)]
    pub grantable_to: Vec<String>,
}

/// Build the canonical entitlement id for a resource and slug.
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{}:{}:{}", resource.resource_type, resource.resource, slug)
}

impl Entitlement {
    /// Create a permission entitlement on `resource`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the slug is blank.
    pub fn permission(resource: &Resource, slug: impl Into<String>) -> ConnectorResult<Self> {
        Self::build(resource, slug.into(), EntitlementPurpose::Permission)
    }

    /// Create an assignment entitlement on `resource`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the slug is blank.
    pub fn assignment(resource: &Resource, slug: impl Into<String>) -> ConnectorResult<Self> {
        Self::build(resource, slug.into(), EntitlementPurpose::Assignment)
    }

    fn build(resource: &Resource, slug: String, purpose: EntitlementPurpose) -> ConnectorResult<Self> {
        if slug.trim().is_empty() {
            return Err(ConnectorError::invalid_resource(format!(
                "entitlement slug must not be empty (resource {})",
                resource.id
            )));
        }

        Ok(Self {
            id: entitlement_id(&resource.id, &slug),
            resource: resource.id.clone(),
            display_name: slug.clone(),
            slug,
            description: String::new(),
            purpose,
            grantable_to: Vec::new(),
        })
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allow granting to resources of this type.
    pub fn with_grantable_to(mut self, resource_type: &ResourceType) -> Self {
        if !self.grantable_to.contains(&resource_type.id) {
            self.grantable_to.push(resource_type.id.clone());
        }
        self
    }

    /// Whether a principal of the given type may receive this entitlement.
    ///
    /// An entitlement without restrictions is grantable to any type.
    pub fn is_grantable_to(&self, resource_type_id: &str) -> bool {
        self.grantable_to.is_empty() || self.grantable_to.iter().any(|t| t == resource_type_id)
    }
}
