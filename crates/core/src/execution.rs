//! Handle of a submitted workload.

use serde::{Deserialize, Serialize};

/// Identifies where an action is running.
///
/// Produced by a workload executor as soon as the workload has a name, and
/// held by the orchestrator until the workload has been observed and its
/// sandbox torn down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Workload (pod) name. This is the identifier reported to callers.
    pub workload: String,
    /// Namespace the workload runs in.
    pub namespace: String,
    /// Identity the workload runs under, when one was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
}

impl ExecutionContext {
    /// Create a context without a service account.
    pub fn new(workload: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            workload: workload.into(),
            namespace: namespace.into(),
            service_account: None,
        }
    }

    /// Attach the service account the workload runs under.
    pub fn with_service_account(mut self, service_account: impl Into<String>) -> Self {
        self.service_account = Some(service_account.into());
        self
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.workload)
    }
}
