#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Core
//!
//! Data model shared by every Brig crate.
//!
//! ## Key Components
//!
//! - **Identifiers**: [`InstanceId`] for service instances
//! - **Actions**: [`ActionName`], a normalized action key such as `deprovision`
//! - **Instances**: [`ServiceInstance`] with its [`ServiceSpec`], [`InstanceContext`]
//!   and invocation [`Parameters`]
//! - **Cluster**: [`ClusterConfig`], passed through to drivers untouched
//! - **Execution**: [`ExecutionContext`], the handle of a submitted workload
//!
//! ## Usage
//!
//! ```rust
//! use brig_core::{ActionName, InstanceContext, InstanceId, ServiceInstance, ServiceSpec};
//!
//! let instance = ServiceInstance::new(
//!     ServiceSpec::new(InstanceId::v4(), "mediawiki-apb", "docker.io/ansibleplaybookbundle/mediawiki-apb"),
//!     InstanceContext::kubernetes("wiki"),
//! );
//! assert!(instance.validate().is_ok());
//! assert_eq!(ActionName::deprovision().as_str(), "deprovision");
//! ```

pub mod action;
pub mod cluster;
pub mod error;
pub mod execution;
pub mod id;
pub mod instance;

pub use action::{ActionName, ActionNameError};
pub use cluster::{ClusterConfig, PullPolicy};
pub use error::CoreError;
pub use execution::ExecutionContext;
pub use id::*;
pub use instance::{InstanceContext, Parameters, ServiceInstance, ServiceSpec};

/// Result type used throughout Brig core.
pub type Result<T> = std::result::Result<T, CoreError>;
