//! Result of one action run.

use crate::error::OrchestratorError;
use crate::phase::ActionPhase;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// The workload ran to a clean terminal state.
    Completed {
        /// Output collected by the observer.
        output: String,
    },
    /// The namespace was absent or terminating; nothing was run.
    Skipped {
        /// The namespace that was gone.
        namespace: String,
    },
}

/// The workload identifier of a run paired with its result.
///
/// The identifier is reported on failure too, whenever a workload was
/// named before things went wrong.
#[derive(Debug)]
pub struct ActionOutcome {
    workload: Option<String>,
    result: Result<ActionStatus, OrchestratorError>,
    phases: Vec<ActionPhase>,
}

impl ActionOutcome {
    pub(crate) fn new(
        workload: Option<String>,
        result: Result<ActionStatus, OrchestratorError>,
        phases: Vec<ActionPhase>,
    ) -> Self {
        Self {
            workload,
            result,
            phases,
        }
    }

    /// Workload identifier, if one was assigned.
    pub fn workload(&self) -> Option<&str> {
        self.workload.as_deref()
    }

    /// Workload identifier, or the empty string when none was assigned.
    pub fn workload_or_empty(&self) -> &str {
        self.workload.as_deref().unwrap_or_default()
    }

    /// The run's result.
    pub fn result(&self) -> &Result<ActionStatus, OrchestratorError> {
        &self.result
    }

    /// The error, if the run failed.
    pub fn error(&self) -> Option<&OrchestratorError> {
        self.result.as_ref().err()
    }

    /// Returns `true` if every stage succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns `true` if the run ended early on a gone namespace.
    pub fn is_skipped(&self) -> bool {
        matches!(self.result, Ok(ActionStatus::Skipped { .. }))
    }

    /// Phases the run walked through, in order.
    pub fn phases(&self) -> &[ActionPhase] {
        &self.phases
    }

    /// Convert into a plain result, dropping the identifier on failure.
    pub fn into_result(self) -> Result<ActionStatus, OrchestratorError> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brig_ports::PortsError;

    #[test]
    fn skipped_has_empty_identifier() {
        let outcome = ActionOutcome::new(
            None,
            Ok(ActionStatus::Skipped {
                namespace: "gone".into(),
            }),
            vec![
                ActionPhase::Validating,
                ActionPhase::CheckingNamespace,
                ActionPhase::ShortCircuitDone,
            ],
        );
        assert!(outcome.is_success());
        assert!(outcome.is_skipped());
        assert_eq!(outcome.workload_or_empty(), "");
        assert_eq!(outcome.phases().last(), Some(&ActionPhase::ShortCircuitDone));
    }

    #[test]
    fn failure_keeps_identifier() {
        let outcome = ActionOutcome::new(
            Some("pod-123".into()),
            Err(OrchestratorError::Observation {
                workload: "pod-123".into(),
                namespace: "db".into(),
                source: PortsError::workload_failed("pod-123", "Failed"),
            }),
            Vec::new(),
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.workload(), Some("pod-123"));
        assert!(outcome.into_result().is_err());
    }
}
