//! Error types for port operations.
//!
//! Every port method reports failures as a [`PortsError`]. Drivers map
//! their internal errors into these variants so the runtime can classify
//! failures without knowing the concrete backend.

use std::time::Duration;

/// Error type for all port operations.
///
/// Distinguishes retryable failures (connection, timeout) from permanent
/// ones (not found, permission, quota, invalid spec) so callers can apply
/// retry policies without inspecting error messages.
#[derive(Debug, thiserror::Error)]
pub enum PortsError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (e.g. "Namespace", "Pod").
        entity: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// Backend connection failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Operation exceeded its timeout.
    #[error("timeout: {operation} after {duration:?}")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
        /// How long was waited before giving up.
        duration: Duration,
    },

    /// Operation was cancelled by the caller.
    #[error("cancelled: {operation}")]
    Cancelled {
        /// Name of the operation that was cancelled.
        operation: String,
    },

    /// The cluster refused the request on authorization grounds.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The cluster refused the request because a quota was exhausted.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The request could not be built from the given instance fields.
    #[error("invalid workload spec: {0}")]
    InvalidSpec(String),

    /// The workload reached a terminal state other than success.
    #[error("workload {workload} failed: {reason}")]
    WorkloadFailed {
        /// Workload name.
        workload: String,
        /// Terminal phase or exit reason.
        reason: String,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortsError {
    /// Convenience constructor for [`PortsError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Convenience constructor for [`PortsError::Timeout`].
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Convenience constructor for [`PortsError::Cancelled`].
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Convenience constructor for [`PortsError::WorkloadFailed`].
    pub fn workload_failed(workload: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WorkloadFailed {
            workload: workload.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for transient errors a caller may retry.
    ///
    /// Currently [`Connection`](Self::Connection) and [`Timeout`](Self::Timeout).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout { .. })
    }

    /// Returns `true` if this is a [`NotFound`](Self::NotFound).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for PortsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_found_convenience() {
        let err = PortsError::not_found("Namespace", "db");
        match &err {
            PortsError::NotFound { entity, id } => {
                assert_eq!(entity, "Namespace");
                assert_eq!(id, "db");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(err.is_not_found());
    }

    #[test]
    fn timeout_convenience() {
        let dur = Duration::from_secs(5);
        let err = PortsError::timeout("watch pod-1", dur);
        match &err {
            PortsError::Timeout {
                operation,
                duration,
            } => {
                assert_eq!(operation, "watch pod-1");
                assert_eq!(*duration, dur);
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    // ── is_retryable ────────────────────────────────────────────────────

    #[test]
    fn connection_is_retryable() {
        assert!(PortsError::Connection("refused".into()).is_retryable());
    }

    #[test]
    fn timeout_is_retryable() {
        assert!(PortsError::timeout("op", Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!PortsError::not_found("X", "1").is_retryable());
        assert!(!PortsError::PermissionDenied("rbac".into()).is_retryable());
        assert!(!PortsError::QuotaExceeded("pods".into()).is_retryable());
        assert!(!PortsError::InvalidSpec("no image".into()).is_retryable());
        assert!(!PortsError::workload_failed("pod-1", "Failed").is_retryable());
        assert!(!PortsError::cancelled("watch").is_retryable());
        assert!(!PortsError::Internal("oops".into()).is_retryable());
    }

    #[test]
    fn from_serde_json_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let ports_err: PortsError = serde_err.into();
        assert!(matches!(ports_err, PortsError::Serialization(ref msg) if !msg.is_empty()));
    }

    // ── Display ─────────────────────────────────────────────────────────

    #[test]
    fn display_not_found() {
        let err = PortsError::not_found("Namespace", "db");
        assert_eq!(err.to_string(), "Namespace not found: db");
    }

    #[test]
    fn display_workload_failed() {
        let err = PortsError::workload_failed("pod-123", "phase Failed");
        assert_eq!(err.to_string(), "workload pod-123 failed: phase Failed");
    }

    #[test]
    fn display_cancelled() {
        assert_eq!(
            PortsError::cancelled("watch pod-1").to_string(),
            "cancelled: watch pod-1"
        );
    }
}
