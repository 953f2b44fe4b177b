//! Orchestrator error types.

use brig_core::{ActionName, CoreError};
use brig_ports::PortsError;

/// Coarse classification of an [`OrchestratorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required instance fields are missing.
    Configuration,
    /// The namespace state could not be determined.
    ClusterQuery,
    /// The workload could not be submitted.
    Execution,
    /// The workload could not be watched to a clean terminal state.
    Observation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::ClusterQuery => write!(f, "cluster_query"),
            Self::Execution => write!(f, "execution"),
            Self::Observation => write!(f, "observation"),
        }
    }
}

/// Errors returned by an action run.
///
/// Sandbox teardown failures never appear here; they are logged and counted.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Required instance fields are missing. Nothing was contacted.
    #[error("configuration error: {0}")]
    Configuration(#[from] CoreError),

    /// The namespace lookup failed. No sandbox was created.
    #[error("could not determine state of namespace {namespace}: {source}")]
    ClusterQuery {
        /// Namespace that was looked up.
        namespace: String,
        /// Underlying cluster error.
        #[source]
        source: PortsError,
    },

    /// The workload could not be submitted.
    #[error("problem executing action {action} in namespace {namespace}: {source}")]
    Execution {
        /// Action that was being submitted.
        action: ActionName,
        /// Target namespace.
        namespace: String,
        /// Workload name, if one was assigned before the failure.
        workload: Option<String>,
        /// Underlying submission error.
        #[source]
        source: PortsError,
    },

    /// The workload ran but did not reach a clean terminal state.
    #[error("error watching workload {workload} in namespace {namespace}: {source}")]
    Observation {
        /// Workload name.
        workload: String,
        /// Namespace the workload runs in.
        namespace: String,
        /// Timeout, cancellation, stream failure or failed terminal state.
        #[source]
        source: PortsError,
    },
}

impl OrchestratorError {
    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::ClusterQuery { .. } => ErrorKind::ClusterQuery,
            Self::Execution { .. } => ErrorKind::Execution,
            Self::Observation { .. } => ErrorKind::Observation,
        }
    }

    /// Workload this error is about, if one existed.
    pub fn workload(&self) -> Option<&str> {
        match self {
            Self::Execution { workload, .. } => workload.as_deref(),
            Self::Observation { workload, .. } => Some(workload),
            Self::Configuration(_) | Self::ClusterQuery { .. } => None,
        }
    }

    /// Namespace this error is about, if known.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => None,
            Self::ClusterQuery { namespace, .. }
            | Self::Execution { namespace, .. }
            | Self::Observation { namespace, .. } => Some(namespace),
        }
    }

    /// The collaborator error underneath, if any.
    pub fn port_error(&self) -> Option<&PortsError> {
        match self {
            Self::Configuration(_) => None,
            Self::ClusterQuery { source, .. }
            | Self::Execution { source, .. }
            | Self::Observation { source, .. } => Some(source),
        }
    }

    /// Whether retrying the whole run might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.port_error().is_some_and(PortsError::is_retryable)
    }
}
