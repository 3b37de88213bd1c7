//! # Expensify Connector
//!
//! Syncs Expensify expense policies and their employees into the xavyo
//! governance model.
//!
//! ## Resource model
//!
//! - `policy` - one resource per policy the partner credential administers,
//!   with `admin`, `auditor` and `user` permission entitlements
//! - `user` - one resource per policy employee, keyed by email and nested
//!   under its policy
//!
//! An employee's role on a policy becomes a grant of the matching entitlement.
//!
//! ## Example
//!
//! ```ignore
//! use xavyo_connector::prelude::*;
//! use xavyo_connector_expensify::{ExpensifyConfig, ExpensifyConnector};
//!
//! let config = ExpensifyConfig::from_env();
//! let connector = ExpensifyConnector::new(config)?;
//! connector.validate().await?;
//! ```

pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod mapping;
pub mod models;
pub mod policies;
pub mod rate_limit;
pub mod users;

// Re-exports
pub use client::{ApiResponse, ExpensifyClient};
pub use config::{ExpensifyConfig, DEFAULT_BASE_URL};
pub use connector::ExpensifyConnector;
pub use error::{ExpensifyError, ExpensifyResult};
pub use mapping::PolicyRole;
pub use models::{Policy, User};
pub use policies::PolicySyncer;
pub use users::UserSyncer;
