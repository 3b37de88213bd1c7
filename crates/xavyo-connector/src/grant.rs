//! Grants: assignments of an entitlement to a principal.

use serde::{Deserialize, Serialize};

use crate::entitlement::entitlement_id;
use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::{Resource, ResourceId};

/// Reference to the entitlement a grant assigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitlementRef {
    pub id: String,
    pub resource: ResourceId,
    pub slug: String,
}

/// An entitlement held by a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// Grant id, `entitlement_id:principal_type:principal_id`.
    pub id: String,
    pub entitlement: EntitlementRef,
    pub principal: ResourceId,
}

impl Grant {
    /// Grant the entitlement `slug` on `resource` to `principal`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the slug is blank.
    pub fn new(
        resource: &Resource,
        slug: impl Into<String>,
        principal: ResourceId,
    ) -> ConnectorResult<Self> {
        let slug = slug.into();
        if slug.trim().is_empty() {
            return Err(ConnectorError::invalid_resource(format!(
                "grant slug must not be empty (resource {})",
                resource.id
            )));
        }

        let entitlement = EntitlementRef {
            id: entitlement_id(&resource.id, &slug),
            resource: resource.id.clone(),
            slug,
        };
        let id = format!(
            "{}:{}:{}",
            entitlement.id, principal.resource_type, principal.resource
        );

        Ok(Self {
            id,
            entitlement,
            principal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceType;

    #[test]
    fn test_grant_ids() {
        let policy =
            Resource::new(&ResourceType::new("policy", "Policy"), "P1", "Travel").unwrap();
        let principal = ResourceId::new("user", "a@example.com").unwrap();

        let grant = Grant::new(&policy, "admin", principal.clone()).unwrap();
        assert_eq!(grant.entitlement.id, "policy:P1:admin");
        assert_eq!(grant.id, "policy:P1:admin:user:a@example.com");
        assert_eq!(grant.principal, principal);
    }
}
