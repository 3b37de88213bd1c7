//! Records returned by the Expensify Integration Server.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field that Expensify may send as `null`, mapping `null` to
/// the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An expense policy the partner credential administers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Email of the policy owner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
    /// The calling credential's role on this policy.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// Policy plan type (e.g., "corporate", "team").
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub policy_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_currency: String,
}

/// An employee of a policy.
///
/// Expensify exposes no stable user id; the email is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Role within the policy ("admin", "auditor", "user").
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// Email of the approver this employee submits reports to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub submits_to: String,
}
