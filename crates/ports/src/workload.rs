//! Workload submission and observation ports.

use async_trait::async_trait;
use brig_core::{
    ActionName, ClusterConfig, ExecutionContext, InstanceContext, Parameters, ServiceSpec,
};

use crate::error::PortsError;

/// Result of submitting a workload.
///
/// A workload can get a name before its submission fails (the pod object
/// was created but a later step was refused). Such a failure still carries
/// the context so the caller can tear it down and report the name.
#[derive(Debug)]
pub enum Submission {
    /// The workload was submitted and is running.
    Submitted(ExecutionContext),
    /// Submission failed.
    Failed {
        /// Context of the workload, if one was named before the failure.
        context: Option<ExecutionContext>,
        /// Why submission failed.
        error: PortsError,
    },
}

impl Submission {
    /// A failure before any workload was named.
    pub fn failed(error: PortsError) -> Self {
        Self::Failed {
            context: None,
            error,
        }
    }

    /// A failure after the workload was named.
    pub fn failed_with(context: ExecutionContext, error: PortsError) -> Self {
        Self::Failed {
            context: Some(context),
            error,
        }
    }

    /// The execution context, whether or not submission succeeded.
    pub fn context(&self) -> Option<&ExecutionContext> {
        match self {
            Self::Submitted(context) => Some(context),
            Self::Failed { context, .. } => context.as_ref(),
        }
    }

    /// The submitted context, or the error together with any context named
    /// before it.
    pub fn into_result(self) -> Result<ExecutionContext, (Option<ExecutionContext>, PortsError)> {
        match self {
            Self::Submitted(context) => Ok(context),
            Self::Failed { context, error } => Err((context, error)),
        }
    }
}

/// Submits a workload that runs an action against a bundle image.
#[async_trait]
pub trait WorkloadExecutor: Send + Sync {
    /// Submit a workload running `action` with `parameters` in the
    /// namespace named by `context`.
    async fn execute(
        &self,
        action: &ActionName,
        config: &ClusterConfig,
        spec: &ServiceSpec,
        context: &InstanceContext,
        parameters: &Parameters,
    ) -> Submission;
}

/// A watch that ended without a clean terminal success.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct WatchFailure {
    /// Output gathered before the failure, possibly empty.
    pub output: String,
    /// What went wrong.
    #[source]
    pub error: PortsError,
}

impl WatchFailure {
    /// A failure with no output.
    pub fn new(error: PortsError) -> Self {
        Self {
            output: String::new(),
            error,
        }
    }

    /// A failure with partial output.
    pub fn with_output(error: PortsError, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error,
        }
    }
}

impl From<PortsError> for WatchFailure {
    fn from(error: PortsError) -> Self {
        Self::new(error)
    }
}

/// Watches a running workload until it reaches a terminal state.
#[async_trait]
pub trait WorkloadObserver: Send + Sync {
    /// Block until `workload` in `namespace` terminates, returning its output.
    async fn watch(&self, workload: &str, namespace: &str) -> Result<String, WatchFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_exposes_context() {
        let submission = Submission::Submitted(ExecutionContext::new("pod-1", "ns"));
        assert_eq!(submission.context().map(|c| c.workload.as_str()), Some("pod-1"));
        assert_eq!(submission.into_result().unwrap().workload, "pod-1");
    }

    #[test]
    fn failed_with_keeps_context() {
        let submission = Submission::failed_with(
            ExecutionContext::new("pod-2", "ns"),
            PortsError::QuotaExceeded("pods".into()),
        );
        assert_eq!(submission.context().map(|c| c.workload.as_str()), Some("pod-2"));
        let (context, error) = submission.into_result().unwrap_err();
        assert_eq!(context.unwrap().workload, "pod-2");
        assert!(matches!(error, PortsError::QuotaExceeded(_)));
    }

    #[test]
    fn failed_without_context() {
        let submission = Submission::failed(PortsError::PermissionDenied("sa".into()));
        assert!(submission.context().is_none());
    }

    #[test]
    fn watch_failure_displays_inner_error() {
        let failure = WatchFailure::with_output(
            PortsError::workload_failed("pod-1", "phase Failed"),
            "TASK [fail]",
        );
        assert_eq!(failure.to_string(), "workload pod-1 failed: phase Failed");
        assert_eq!(failure.output, "TASK [fail]");
    }
}
