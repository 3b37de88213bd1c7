//! # Connector Framework
//!
//! Core abstractions for syncing identities and access from external systems
//! into the xavyo governance model.
//!
//! A connector reports what exists on a target system as a graph of
//! resources, entitlements and grants:
//!
//! - [`Resource`](resource::Resource) - a user, workspace, group or app, optionally nested under a parent
//! - [`Entitlement`](entitlement::Entitlement) - a permission definable on a resource
//! - [`Grant`](grant::Grant) - an entitlement held by a principal resource
//!
//! ## Architecture
//!
//! - [`Connector`](traits::Connector) - Base trait all connectors implement
//! - [`ResourceSyncer`](traits::ResourceSyncer) - One per resource type; lists resources,
//!   entitlements and grants page by page
//!
//! ## Example
//!
//! ```ignore
//! use xavyo_connector::prelude::*;
//!
//! connector.validate().await?;
//!
//! for syncer in connector.resource_syncers() {
//!     let page = syncer.list(None, &PageToken::start()).await?;
//!     for resource in &page.items {
//!         let grants = syncer.grants(resource, &PageToken::start()).await?;
//!     }
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`resource`] - Resource types, ids, user traits
//! - [`entitlement`] / [`grant`] - Access model
//! - [`annotations`] - Child resource types and rate-limit descriptors
//! - [`pagination`] - Page tokens and pages
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - Connector and syncer traits
//! - [`config`] - Configuration trait and shared settings

pub mod annotations;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod grant;
pub mod pagination;
pub mod resource;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use xavyo_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotations::{
        Annotation, Annotations, RateLimitDescription, RateLimitStatus,
    };
    pub use crate::config::{ConfigField, ConnectionSettings, ConnectorConfig};
    pub use crate::entitlement::{Entitlement, EntitlementPurpose};
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::grant::{EntitlementRef, Grant};
    pub use crate::pagination::{Page, PageToken};
    pub use crate::resource::{
        Resource, ResourceId, ResourceTrait, ResourceType, UserEmail, UserStatus, UserTrait,
    };
    pub use crate::traits::{Connector, ConnectorMetadata, ResourceSyncer};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
