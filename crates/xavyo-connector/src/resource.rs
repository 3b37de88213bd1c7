//! Resource model shared by all connectors.
//!
//! A resource is anything the governance platform tracks on the target
//! system: users, groups, workspaces, applications. Resources form a tree via
//! `parent_resource_id` and are typed by a [`ResourceType`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::annotations::{Annotation, Annotations};
use crate::error::{ConnectorError, ConnectorResult};

/// Capability marker carried by a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTrait {
    User,
    Group,
    Role,
    App,
}

/// Declaration of a kind of resource a connector syncs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Stable type id (e.g., "user").
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Traits for resources of this type.
    #[serde(default)]
    pub traits: Vec<ResourceTrait>,
}

impl ResourceType {
    /// Create a resource type without traits.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            traits: Vec::new(),
        }
    }

    /// Add a trait.
    pub fn with_trait(mut self, resource_trait: ResourceTrait) -> Self {
        if !self.traits.contains(&resource_trait) {
            self.traits.push(resource_trait);
        }
        self
    }

    /// Whether this type carries the given trait.
    pub fn has_trait(&self, resource_trait: ResourceTrait) -> bool {
        self.traits.contains(&resource_trait)
    }
}

/// Globally unique reference to a resource: its type id plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type id.
    pub resource_type: String,
    /// Resource id within the type.
    pub resource: String,
}

impl ResourceId {
    /// Create a reference, rejecting blank components.
    pub fn new(resource_type: impl Into<String>, resource: impl Into<String>) -> ConnectorResult<Self> {
        let resource_type = resource_type.into();
        let resource = resource.into();

        if resource_type.trim().is_empty() {
            return Err(ConnectorError::invalid_resource(
                "resource type id must not be empty",
            ));
        }
        if resource.trim().is_empty() {
            return Err(ConnectorError::invalid_resource(format!(
                "resource id must not be empty (type '{resource_type}')"
            )));
        }

        Ok(Self {
            resource_type,
            resource,
        })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Account status of a user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Enabled,
    Disabled,
    Deleted,
    Unspecified,
}

/// Email address on a user resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    pub address: String,
    pub is_primary: bool,
}

/// User-specific details attached to a resource of a `User`-trait type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserTrait {
    /// Free-form profile attributes.
    #[serde(default)]
    pub profile: serde_json::Map<String, serde_json::Value>,
    /// Known email addresses.
    #[serde(default)]
    pub emails: Vec<UserEmail>,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
}

impl UserTrait {
    /// Create an empty user trait.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a profile attribute.
    pub fn with_profile_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.profile.insert(name.into(), value.into());
        self
    }

    /// Add an email address.
    pub fn with_email(mut self, address: impl Into<String>, is_primary: bool) -> Self {
        self.emails.push(UserEmail {
            address: address.into(),
            is_primary,
        });
        self
    }

    /// The primary email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| e.is_primary)
            .map(|e| e.address.as_str())
    }
}

/// A resource observed on the target system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_resource_id: Option<ResourceId>,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_trait: Option<UserTrait>,
}

impl Resource {
    /// Create a resource of the given type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the id or the type id is blank.
    pub fn new(
        resource_type: &ResourceType,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> ConnectorResult<Self> {
        Ok(Self {
            id: ResourceId::new(resource_type.id.clone(), id)?,
            display_name: display_name.into(),
            parent_resource_id: None,
            annotations: Annotations::new(),
            user_trait: None,
        })
    }

    /// Create a user resource.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the id is blank or the type does not
    /// carry the `User` trait.
    pub fn new_user(
        resource_type: &ResourceType,
        id: impl Into<String>,
        display_name: impl Into<String>,
        user_trait: UserTrait,
    ) -> ConnectorResult<Self> {
        if !resource_type.has_trait(ResourceTrait::User) {
            return Err(ConnectorError::invalid_resource(format!(
                "resource type '{}' does not carry the user trait",
                resource_type.id
            )));
        }

        Ok(Self::new(resource_type, id, display_name)?.with_user_trait(user_trait))
    }

    /// Attach the resource to a parent.
    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.parent_resource_id = Some(parent);
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declare that this resource may contain children of the given type.
    pub fn with_child_resource_type(self, child: &ResourceType) -> Self {
        self.with_annotation(Annotation::ChildResourceType {
            resource_type_id: child.id.clone(),
        })
    }

    /// Set user details.
    pub fn with_user_trait(mut self, user_trait: UserTrait) -> Self {
        self.user_trait = Some(user_trait);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_type() -> ResourceType {
        ResourceType::new("user", "User").with_trait(ResourceTrait::User)
    }

    #[test]
    fn test_resource_id_display() {
        let id = ResourceId::new("policy", "F00D").unwrap();
        assert_eq!(id.to_string(), "policy:F00D");
    }

    #[test]
    fn test_blank_ids_rejected() {
        let ty = ResourceType::new("policy", "Policy");
        let err = Resource::new(&ty, "  ", "Empty").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RESOURCE");

        let blank_type = ResourceType::new("", "Nameless");
        assert!(Resource::new(&blank_type, "id-1", "x").is_err());
    }

    #[test]
    fn test_new_user_requires_user_trait() {
        let ty = ResourceType::new("policy", "Policy");
        let result = Resource::new_user(&ty, "a@example.com", "a", UserTrait::new());
        assert!(result.is_err());

        let user = Resource::new_user(
            &user_type(),
            "a@example.com",
            "a@example.com",
            UserTrait::new().with_email("a@example.com", true),
        )
        .unwrap();
        assert_eq!(
            user.user_trait.as_ref().and_then(UserTrait::primary_email),
            Some("a@example.com")
        );
    }

    #[test]
    fn test_child_resource_type_annotation() {
        let parent = Resource::new(&ResourceType::new("policy", "Policy"), "P1", "Travel")
            .unwrap()
            .with_child_resource_type(&user_type());

        let children: Vec<&str> = parent.annotations.child_resource_types().collect();
        assert_eq!(children, vec!["user"]);
    }

    #[test]
    fn test_with_trait_is_idempotent() {
        let ty = user_type().with_trait(ResourceTrait::User);
        assert_eq!(ty.traits.len(), 1);
    }
}
