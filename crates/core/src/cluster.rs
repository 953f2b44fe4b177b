//! Cluster connection and sandbox configuration.

use serde::{Deserialize, Serialize};

/// Image pull policy for workload containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    /// Always pull.
    Always,
    /// Pull only if the image is not cached on the node.
    #[default]
    IfNotPresent,
    /// Never pull.
    Never,
}

impl PullPolicy {
    /// The Kubernetes spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::IfNotPresent => "IfNotPresent",
            Self::Never => "Never",
        }
    }
}

/// Parameters needed to reach the cluster and shape the sandbox.
///
/// The runtime never inspects this; it hands it to drivers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Kubeconfig context to use. `None` means in-cluster or the current context.
    pub context: Option<String>,
    /// Cluster role bound to the sandbox service account.
    pub sandbox_role: String,
    /// Image pull policy for the workload container.
    pub pull_policy: PullPolicy,
    /// Leave the finished workload in place on teardown (debugging aid).
    pub keep_workload: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            context: None,
            sandbox_role: "edit".to_owned(),
            pull_policy: PullPolicy::default(),
            keep_workload: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_edit_role() {
        let config = ClusterConfig::default();
        assert_eq!(config.sandbox_role, "edit");
        assert_eq!(config.pull_policy, PullPolicy::IfNotPresent);
        assert!(!config.keep_workload);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClusterConfig =
            serde_json::from_str(r#"{"pull_policy":"Always"}"#).unwrap();
        assert_eq!(config.pull_policy.as_str(), "Always");
        assert_eq!(config.sandbox_role, "edit");
    }
}
