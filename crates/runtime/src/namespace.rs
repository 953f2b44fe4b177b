//! Namespace state oracle.

use std::sync::Arc;

use brig_ports::{ClusterClient, NamespaceState, PortsError};

/// Answers whether an instance's namespace is still usable.
///
/// The answer is advisory: the namespace can start terminating right after
/// a lookup says it is active.
#[derive(Clone)]
pub struct NamespaceOracle {
    client: Arc<dyn ClusterClient>,
}

impl NamespaceOracle {
    /// Create an oracle over a cluster client.
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self { client }
    }

    /// Look up the namespace state.
    ///
    /// A lookup failure is returned as an error, never folded into
    /// "deleted".
    pub async fn state(&self, namespace: &str) -> Result<NamespaceState, PortsError> {
        let state = self.client.get_namespace(namespace).await?;
        tracing::debug!(namespace, ?state, "namespace state");
        Ok(state)
    }

    /// Returns `true` if the namespace is absent or terminating.
    pub async fn is_deleted(&self, namespace: &str) -> Result<bool, PortsError> {
        Ok(self.state(namespace).await?.is_gone())
    }
}

impl std::fmt::Debug for NamespaceOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceOracle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brig_driver_memory::MemoryCluster;
    use brig_ports::NamespacePhase;
    use rstest::rstest;

    #[rstest]
    #[case(NamespaceState::Absent, true)]
    #[case(NamespaceState::Present(NamespacePhase::Terminating), true)]
    #[case(NamespaceState::Present(NamespacePhase::Active), false)]
    #[case(NamespaceState::Present(NamespacePhase::Other("Frozen".into())), false)]
    #[tokio::test]
    async fn is_deleted_by_state(#[case] state: NamespaceState, #[case] expected: bool) {
        let cluster = MemoryCluster::new().with_namespace_state("db", state);
        let oracle = NamespaceOracle::new(Arc::new(cluster));
        assert_eq!(oracle.is_deleted("db").await.unwrap(), expected);
    }

    #[tokio::test]
    async fn unknown_namespace_is_absent() {
        let oracle = NamespaceOracle::new(Arc::new(MemoryCluster::new()));
        assert!(oracle.is_deleted("never-created").await.unwrap());
    }

    #[tokio::test]
    async fn lookup_failure_is_surfaced() {
        let cluster = MemoryCluster::new()
            .with_namespace("db")
            .failing_with(|| PortsError::Connection("dial tcp: i/o timeout".into()));
        let oracle = NamespaceOracle::new(Arc::new(cluster));
        let err = oracle.is_deleted("db").await.unwrap_err();
        assert!(matches!(err, PortsError::Connection(_)));
    }
}
