//! Mapping from Expensify records to resources, entitlements and grants.
//!
//! Pure functions; no I/O.

use tracing::warn;
use xavyo_connector::entitlement::Entitlement;
use xavyo_connector::error::{ConnectorError, ConnectorResult};
use xavyo_connector::grant::Grant;
use xavyo_connector::resource::{Resource, ResourceId, ResourceTrait, ResourceType, UserTrait};

use crate::models::{Policy, User};

/// Resource type id for policy employees.
pub const USER_RESOURCE_TYPE: &str = "user";

/// Resource type id for expense policies.
pub const POLICY_RESOURCE_TYPE: &str = "policy";

/// The `user` resource type.
pub fn resource_type_user() -> ResourceType {
    ResourceType::new(USER_RESOURCE_TYPE, "User").with_trait(ResourceTrait::User)
}

/// The `policy` resource type.
pub fn resource_type_policy() -> ResourceType {
    ResourceType::new(POLICY_RESOURCE_TYPE, "Policy")
}

/// Role an employee holds within a policy.
///
/// Expensify has no way to discover roles, so the set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyRole {
    Admin,
    Auditor,
    User,
}

impl PolicyRole {
    /// All roles, in entitlement order.
    pub const ALL: [PolicyRole; 3] = [PolicyRole::Admin, PolicyRole::Auditor, PolicyRole::User];

    /// Role name as Expensify reports it, also used as the entitlement slug.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyRole::Admin => "admin",
            PolicyRole::Auditor => "auditor",
            PolicyRole::User => "user",
        }
    }

    /// Parse an Expensify role name. Matching is exact.
    pub fn from_api(role: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == role)
    }
}

impl std::fmt::Display for PolicyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn mapping_error(record: &str, err: ConnectorError) -> ConnectorError {
    ConnectorError::invalid_mapping(format!("{record}: {err}"))
}

/// Build the resource for a policy. Policies may contain users.
pub fn policy_resource(policy: &Policy) -> ConnectorResult<Resource> {
    let resource = Resource::new(&resource_type_policy(), policy.id.as_str(), policy.name.as_str())
        .map_err(|e| mapping_error(&format!("policy '{}'", policy.name), e))?;

    Ok(resource.with_child_resource_type(&resource_type_user()))
}

/// Build the resource for an employee nested under `parent`.
///
/// Expensify has no user id, so the email is the resource id, display name,
/// login and `user_id`.
pub fn user_resource(user: &User, parent: &ResourceId) -> ConnectorResult<Resource> {
    let user_trait = UserTrait::new()
        .with_profile_attribute("login", user.email.as_str())
        .with_profile_attribute("user_id", user.email.as_str())
        .with_email(user.email.as_str(), true);

    let resource = Resource::new_user(
        &resource_type_user(),
        user.email.as_str(),
        user.email.as_str(),
        user_trait,
    )
    .map_err(|e| mapping_error(&format!("employee of {parent}"), e))?;

    Ok(resource.with_parent(parent.clone()))
}

/// One permission entitlement per role on the policy, grantable to users.
pub fn policy_entitlements(policy: &Resource) -> ConnectorResult<Vec<Entitlement>> {
    let user_type = resource_type_user();

    PolicyRole::ALL
        .iter()
        .map(|role| -> ConnectorResult<Entitlement> {
            Ok(Entitlement::permission(policy, role.as_str())?
                .with_display_name(format!("{} Policy {}", policy.display_name, role))
                .with_description(format!(
                    "Role in {} Expensify policy",
                    policy.display_name
                ))
                .with_grantable_to(&user_type))
        })
        .collect()
}

/// Grants of the policy's role entitlements to its employees.
///
/// Employees with a role outside the fixed set are skipped with a warning.
pub fn policy_grants(policy: &Resource, employees: &[User]) -> ConnectorResult<Vec<Grant>> {
    let mut grants = Vec::with_capacity(employees.len());

    for employee in employees {
        let Some(role) = PolicyRole::from_api(&employee.role) else {
            warn!(
                role_name = %employee.role,
                user = %employee.email,
                policy_id = %policy.id.resource,
                "Unknown Expensify role name, skipping"
            );
            continue;
        };

        let principal = user_resource(employee, &policy.id)?;
        grants.push(Grant::new(policy, role.as_str(), principal.id)?);
    }

    Ok(grants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy {
            id: "F00D1234".to_string(),
            name: "Travel".to_string(),
            ..Policy::default()
        }
    }

    fn employee(email: &str, role: &str) -> User {
        User {
            email: email.to_string(),
            role: role.to_string(),
            submits_to: String::new(),
        }
    }

    #[test]
    fn test_policy_resource() {
        let resource = policy_resource(&policy()).unwrap();
        assert_eq!(resource.id.resource_type, "policy");
        assert_eq!(resource.id.resource, "F00D1234");
        assert_eq!(resource.display_name, "Travel");

        let children: Vec<&str> = resource.annotations.child_resource_types().collect();
        assert_eq!(children, vec!["user"]);
    }

    #[test]
    fn test_policy_resource_rejects_blank_id() {
        let mut blank = policy();
        blank.id = String::new();
        let err = policy_resource(&blank).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MAPPING");
        assert!(err.is_permanent());
    }

    #[test]
    fn test_user_resource_uses_email_everywhere() {
        let parent = ResourceId::new("policy", "F00D1234").unwrap();
        let resource = user_resource(&employee("jane@example.com", "user"), &parent).unwrap();

        assert_eq!(resource.id.resource_type, "user");
        assert_eq!(resource.id.resource, "jane@example.com");
        assert_eq!(resource.display_name, "jane@example.com");
        assert_eq!(resource.parent_resource_id, Some(parent));

        let user_trait = resource.user_trait.unwrap();
        assert_eq!(user_trait.profile["login"], "jane@example.com");
        assert_eq!(user_trait.profile["user_id"], "jane@example.com");
        assert_eq!(user_trait.primary_email(), Some("jane@example.com"));
    }

    #[test]
    fn test_user_without_email_is_mapping_error() {
        let parent = ResourceId::new("policy", "F00D1234").unwrap();
        let err = user_resource(&employee("", "user"), &parent).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MAPPING");
        assert!(err.to_string().contains("policy:F00D1234"));
    }

    #[test]
    fn test_entitlements_per_role() {
        let resource = policy_resource(&policy()).unwrap();
        let entitlements = policy_entitlements(&resource).unwrap();

        let slugs: Vec<&str> = entitlements.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["admin", "auditor", "user"]);

        let admin = &entitlements[0];
        assert_eq!(admin.id, "policy:F00D1234:admin");
        assert_eq!(admin.display_name, "Travel Policy admin");
        assert_eq!(admin.description, "Role in Travel Expensify policy");
        assert_eq!(admin.grantable_to, vec!["user".to_string()]);
    }

    #[test]
    fn test_admin_employee_gets_admin_grant() {
        let resource = policy_resource(&policy()).unwrap();
        let grants = policy_grants(&resource, &[employee("boss@example.com", "admin")]).unwrap();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].entitlement.id, "policy:F00D1234:admin");
        assert_eq!(grants[0].principal.resource, "boss@example.com");
        assert_eq!(grants[0].principal.resource_type, "user");
    }

    #[test]
    fn test_unknown_role_is_skipped() {
        let resource = policy_resource(&policy()).unwrap();
        let grants = policy_grants(
            &resource,
            &[
                employee("ghost@example.com", "unknown-role"),
                employee("jane@example.com", "auditor"),
            ],
        )
        .unwrap();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].entitlement.slug, "auditor");
    }

    #[test]
    fn test_role_match_is_case_sensitive() {
        assert_eq!(PolicyRole::from_api("admin"), Some(PolicyRole::Admin));
        assert_eq!(PolicyRole::from_api("Admin"), None);
        assert_eq!(PolicyRole::from_api(""), None);
    }
}
