//! Phase machine of a single action run.

use serde::{Deserialize, Serialize};

/// A phase an action run passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPhase {
    /// Checking required instance fields.
    Validating,
    /// Asking the cluster about the target namespace.
    CheckingNamespace,
    /// Ended early: the namespace is gone.
    ShortCircuitDone,
    /// Constructing the sandbox manager.
    AcquiringSandbox,
    /// Submitting the workload.
    Executing,
    /// Watching the workload.
    Observing,
    /// Sandbox teardown has run.
    TornDown,
    /// Finished, with or without an error.
    Done,
}

impl ActionPhase {
    /// Returns `true` if the run has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ShortCircuitDone | Self::Done)
    }

    /// Returns `true` if the sandbox is held in this phase.
    #[must_use]
    pub fn holds_sandbox(&self) -> bool {
        matches!(self, Self::AcquiringSandbox | Self::Executing | Self::Observing)
    }
}

impl std::fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::CheckingNamespace => write!(f, "checking_namespace"),
            Self::ShortCircuitDone => write!(f, "short_circuit_done"),
            Self::AcquiringSandbox => write!(f, "acquiring_sandbox"),
            Self::Executing => write!(f, "executing"),
            Self::Observing => write!(f, "observing"),
            Self::TornDown => write!(f, "torn_down"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Returns `true` if a run may move from `from` to `to`.
#[must_use]
pub fn can_transition(from: ActionPhase, to: ActionPhase) -> bool {
    use ActionPhase::*;
    matches!(
        (from, to),
        (Validating, CheckingNamespace)
            | (Validating, Done)
            | (CheckingNamespace, ShortCircuitDone)
            | (CheckingNamespace, AcquiringSandbox)
            | (CheckingNamespace, Done)
            | (AcquiringSandbox, Executing)
            | (Executing, Observing)
            | (Executing, TornDown)
            | (Observing, TornDown)
            | (TornDown, Done)
    )
}

/// Records the phases a run has walked through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhaseTrail {
    phases: Vec<ActionPhase>,
}

impl PhaseTrail {
    pub(crate) fn new() -> Self {
        Self {
            phases: vec![ActionPhase::Validating],
        }
    }

    pub(crate) fn current(&self) -> ActionPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(ActionPhase::Validating)
    }

    pub(crate) fn advance(&mut self, to: ActionPhase) {
        let from = self.current();
        debug_assert!(
            can_transition(from, to),
            "invalid phase transition {from} -> {to}"
        );
        tracing::trace!(%from, %to, "phase");
        self.phases.push(to);
    }

    pub(crate) fn into_vec(self) -> Vec<ActionPhase> {
        self.phases
    }
}
