//! In-memory cluster client.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use brig_ports::{ClusterClient, NamespacePhase, NamespaceState, PortsError};
use parking_lot::Mutex;

use crate::ErrorFactory;

#[derive(Default)]
struct State {
    namespaces: HashMap<String, NamespacePhase>,
    failure: Option<ErrorFactory>,
    lookups: Vec<String>,
}

/// Cluster client over an in-memory namespace table.
///
/// Unknown namespaces are reported as [`NamespaceState::Absent`].
#[derive(Clone, Default)]
pub struct MemoryCluster {
    state: Arc<Mutex<State>>,
}

impl MemoryCluster {
    /// Create a cluster with no namespaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active namespace.
    pub fn with_namespace(self, name: impl Into<String>) -> Self {
        self.state
            .lock()
            .namespaces
            .insert(name.into(), NamespacePhase::Active);
        self
    }

    /// Set the state of a namespace. [`NamespaceState::Absent`] removes it.
    pub fn with_namespace_state(self, name: impl Into<String>, state: NamespaceState) -> Self {
        self.set_namespace_state(name, state);
        self
    }

    /// Fail every lookup with the error `failure` builds.
    pub fn failing_with<F>(self, failure: F) -> Self
    where
        F: Fn() -> PortsError + Send + Sync + 'static,
    {
        self.state.lock().failure = Some(Arc::new(failure));
        self
    }

    /// Change the state of a namespace after construction.
    pub fn set_namespace_state(&self, name: impl Into<String>, state: NamespaceState) {
        let mut guard = self.state.lock();
        let name = name.into();
        match state {
            NamespaceState::Absent => {
                guard.namespaces.remove(&name);
            }
            NamespaceState::Present(phase) => {
                guard.namespaces.insert(name, phase);
            }
        }
    }

    /// Names looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.state.lock().lookups.clone()
    }
}

#[async_trait]
impl ClusterClient for MemoryCluster {
    async fn get_namespace(&self, name: &str) -> Result<NamespaceState, PortsError> {
        let mut guard = self.state.lock();
        guard.lookups.push(name.to_owned());
        if let Some(failure) = &guard.failure {
            return Err(failure());
        }
        Ok(guard
            .namespaces
            .get(name)
            .cloned()
            .map_or(NamespaceState::Absent, NamespaceState::Present))
    }
}

impl std::fmt::Debug for MemoryCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        f.debug_struct("MemoryCluster")
            .field("namespaces", &guard.namespaces)
            .field("failing", &guard.failure.is_some())
            .finish()
    }
}
