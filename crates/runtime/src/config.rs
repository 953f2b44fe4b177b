//! Orchestrator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do when the target namespace is terminating.
///
/// An absent namespace always ends the run early; there is nothing left to
/// run in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatingNamespacePolicy {
    /// Treat the run as vacuously successful; the namespace takes its
    /// contents with it.
    #[default]
    Skip,
    /// Run the action inside the terminating namespace anyway.
    Run,
}

/// Knobs for [`ActionOrchestrator`](crate::ActionOrchestrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Upper bound on how long a workload is watched.
    #[serde(with = "humantime_serde")]
    pub watch_timeout: Duration,
    /// Behaviour for terminating namespaces.
    pub terminating_namespace: TerminatingNamespacePolicy,
    /// Reject instances whose context names no namespace.
    pub require_namespace: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            watch_timeout: Duration::from_secs(60 * 60),
            terminating_namespace: TerminatingNamespacePolicy::Skip,
            require_namespace: true,
        }
    }
}

impl OrchestratorConfig {
    /// Set the watch timeout.
    pub fn with_watch_timeout(mut self, timeout: Duration) -> Self {
        self.watch_timeout = timeout;
        self
    }

    /// Set the terminating-namespace policy.
    pub fn with_terminating_namespace(mut self, policy: TerminatingNamespacePolicy) -> Self {
        self.terminating_namespace = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.watch_timeout, Duration::from_secs(3600));
        assert_eq!(config.terminating_namespace, TerminatingNamespacePolicy::Skip);
        assert!(config.require_namespace);
    }

    #[test]
    fn humantime_durations() {
        let config: OrchestratorConfig = serde_json::from_str(
            r#"{"watch_timeout":"1m 30s","terminating_namespace":"run"}"#,
        )
        .unwrap();
        assert_eq!(config.watch_timeout, Duration::from_secs(90));
        assert_eq!(config.terminating_namespace, TerminatingNamespacePolicy::Run);
        assert!(config.require_namespace);
    }
}
