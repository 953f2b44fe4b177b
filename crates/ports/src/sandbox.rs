//! Sandbox identity port.
//!
//! A sandbox is the identity (service account and role binding) a workload
//! runs under inside its namespace. The executor creates it alongside the
//! workload; a [`SandboxManager`] tears it down afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use brig_core::{ClusterConfig, ExecutionContext, ServiceInstance};

use crate::error::PortsError;

/// Tears down the sandbox of one action run.
///
/// `destroy` must tolerate being handed no context (nothing was ever
/// created) and sandbox objects that are already gone.
#[async_trait]
pub trait SandboxManager: Send + Sync {
    /// Destroy whatever identity was created for `context`.
    async fn destroy(
        &self,
        context: Option<&ExecutionContext>,
        config: &ClusterConfig,
    ) -> Result<(), PortsError>;
}

/// Creates a [`SandboxManager`] scoped to a single action run.
pub trait SandboxProvider: Send + Sync {
    /// Construct a manager for a run against `instance`.
    fn manager(&self, instance: &ServiceInstance) -> Arc<dyn SandboxManager>;
}
