//! In-memory sandbox provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brig_core::{ClusterConfig, ExecutionContext, ServiceInstance};
use brig_ports::{PortsError, SandboxManager, SandboxProvider};
use parking_lot::Mutex;

use crate::ErrorFactory;

#[derive(Default)]
struct State {
    managers: usize,
    destroys: Vec<Option<ExecutionContext>>,
    finished: usize,
    failure: Option<ErrorFactory>,
    delay: Option<Duration>,
}

/// Sandbox provider that records every teardown.
#[derive(Clone, Default)]
pub struct MemorySandbox {
    state: Arc<Mutex<State>>,
}

impl MemorySandbox {
    /// Create a provider whose managers always destroy successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every teardown with the error `failure` builds.
    pub fn failing_with<F>(self, failure: F) -> Self
    where
        F: Fn() -> PortsError + Send + Sync + 'static,
    {
        self.state.lock().failure = Some(Arc::new(failure));
        self
    }

    /// Take `delay` to finish every teardown.
    pub fn slow(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// Number of managers handed out.
    pub fn managers_created(&self) -> usize {
        self.state.lock().managers
    }

    /// Context passed to every `destroy` call, in order.
    pub fn destroy_calls(&self) -> Vec<Option<ExecutionContext>> {
        self.state.lock().destroys.clone()
    }

    /// Number of `destroy` calls that ran to completion.
    pub fn destroys_finished(&self) -> usize {
        self.state.lock().finished
    }
}

impl SandboxProvider for MemorySandbox {
    fn manager(&self, instance: &ServiceInstance) -> Arc<dyn SandboxManager> {
        self.state.lock().managers += 1;
        tracing::debug!(instance_id = %instance.id(), "memory sandbox manager created");
        Arc::new(MemorySandboxManager {
            state: Arc::clone(&self.state),
        })
    }
}

/// Manager handed out by [`MemorySandbox`].
pub struct MemorySandboxManager {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl SandboxManager for MemorySandboxManager {
    async fn destroy(
        &self,
        context: Option<&ExecutionContext>,
        _config: &ClusterConfig,
    ) -> Result<(), PortsError> {
        let (delay, failure) = {
            let mut guard = self.state.lock();
            guard.destroys.push(context.cloned());
            (guard.delay, guard.failure.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state.lock().finished += 1;
        match failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MemorySandbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        f.debug_struct("MemorySandbox")
            .field("managers", &guard.managers)
            .field("destroys", &guard.destroys.len())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for MemorySandboxManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySandboxManager").finish_non_exhaustive()
    }
}
