//! Annotations attached to resources and sync responses.
//!
//! Annotations carry side-channel information to the sync engine: which child
//! resource types a resource may contain, and the rate-limit state reported by
//! the target system on the last call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rate-limit state reported by the target system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStatus {
    /// No rate-limit information was available.
    #[default]
    Unspecified,
    /// Calls are within the limit.
    Ok,
    /// The limit has been reached; callers should wait for `reset_at`.
    Overlimit,
    /// Rate-limit headers were present but unreadable.
    Error,
}

/// Structured rate-limit descriptor derived from response headers.
///
/// Transient: produced per call and consumed by the scheduler to throttle
/// subsequent calls. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RateLimitDescription {
    /// Overall status.
    pub status: RateLimitStatus,
    /// Maximum calls allowed in the current window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Calls remaining in the current window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    /// When the window resets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitDescription {
    /// Create a descriptor with only a status.
    pub fn new(status: RateLimitStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Set the window limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the remaining call count.
    pub fn with_remaining(mut self, remaining: u64) -> Self {
        self.remaining = Some(remaining);
        self
    }

    /// Set the reset instant.
    pub fn with_reset_at(mut self, reset_at: DateTime<Utc>) -> Self {
        self.reset_at = Some(reset_at);
        self
    }

    /// Whether the caller must back off before the next call.
    pub fn is_overlimit(&self) -> bool {
        self.status == RateLimitStatus::Overlimit
    }
}

/// A single annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// The annotated resource may contain child resources of this type.
    ChildResourceType { resource_type_id: String },
    /// Rate-limit state observed while producing the annotated response.
    RateLimit(RateLimitDescription),
}

/// Ordered collection of annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Append an annotation, builder style.
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.push(annotation);
        self
    }

    /// Record rate-limit state, replacing any earlier descriptor.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitDescription) -> Self {
        self.0.retain(|a| !matches!(a, Annotation::RateLimit(_)));
        self.0.push(Annotation::RateLimit(rate_limit));
        self
    }

    /// Child resource type ids declared by these annotations.
    pub fn child_resource_types(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|a| match a {
            Annotation::ChildResourceType { resource_type_id } => Some(resource_type_id.as_str()),
            Annotation::RateLimit(_) => None,
        })
    }

    /// The recorded rate-limit descriptor, if any.
    pub fn rate_limit(&self) -> Option<&RateLimitDescription> {
        self.0.iter().find_map(|a| match a {
            Annotation::RateLimit(rl) => Some(rl),
            Annotation::ChildResourceType { .. } => None,
        })
    }

    /// Iterate over all annotations.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_replaces_previous() {
        let annos = Annotations::new()
            .with_rate_limit(RateLimitDescription::new(RateLimitStatus::Ok).with_remaining(5))
            .with_rate_limit(RateLimitDescription::new(RateLimitStatus::Overlimit));

        assert_eq!(annos.len(), 1);
        assert!(annos.rate_limit().unwrap().is_overlimit());
    }

    #[test]
    fn test_child_resource_types() {
        let annos = Annotations::new()
            .with(Annotation::ChildResourceType {
                resource_type_id: "user".to_string(),
            })
            .with_rate_limit(RateLimitDescription::default());

        let children: Vec<&str> = annos.child_resource_types().collect();
        assert_eq!(children, vec!["user"]);
    }

    #[test]
    fn test_annotation_serialization() {
        let anno = Annotation::ChildResourceType {
            resource_type_id: "user".to_string(),
        };
        let json = serde_json::to_value(&anno).unwrap();
        assert_eq!(json["type"], "child_resource_type");
        assert_eq!(json["resource_type_id"], "user");
    }
}
