//! In-memory workload observer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brig_ports::{PortsError, WatchFailure, WorkloadObserver};
use parking_lot::Mutex;

use crate::ErrorFactory;

#[derive(Clone)]
enum Script {
    Succeed(String),
    Fail {
        output: String,
        failure: ErrorFactory,
    },
    Hang,
}

struct State {
    script: Script,
    delay: Option<Duration>,
    watches: Vec<(String, String)>,
}

/// Observer that reports scripted terminal states.
#[derive(Clone)]
pub struct MemoryObserver {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryObserver {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                script: Script::Succeed(String::new()),
                delay: None,
                watches: Vec::new(),
            })),
        }
    }
}

impl MemoryObserver {
    /// Create an observer that succeeds immediately with empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with this output.
    pub fn succeeding_with(self, output: impl Into<String>) -> Self {
        self.state.lock().script = Script::Succeed(output.into());
        self
    }

    /// Fail with partial `output` and the error `failure` builds.
    pub fn failing_with<F>(self, output: impl Into<String>, failure: F) -> Self
    where
        F: Fn() -> PortsError + Send + Sync + 'static,
    {
        self.state.lock().script = Script::Fail {
            output: output.into(),
            failure: Arc::new(failure),
        };
        self
    }

    /// Never reach a terminal state.
    pub fn hanging(self) -> Self {
        self.state.lock().script = Script::Hang;
        self
    }

    /// Sleep for `delay` before reporting.
    pub fn delayed(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// `(workload, namespace)` pairs watched so far, in order.
    pub fn watches(&self) -> Vec<(String, String)> {
        self.state.lock().watches.clone()
    }
}

#[async_trait]
impl WorkloadObserver for MemoryObserver {
    async fn watch(&self, workload: &str, namespace: &str) -> Result<String, WatchFailure> {
        let (script, delay) = {
            let mut guard = self.state.lock();
            guard
                .watches
                .push((workload.to_owned(), namespace.to_owned()));
            (guard.script.clone(), guard.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match script {
            Script::Succeed(output) => Ok(output),
            Script::Fail { output, failure } => Err(WatchFailure::with_output(failure(), output)),
            Script::Hang => std::future::pending().await,
        }
    }
}

impl std::fmt::Debug for MemoryObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        f.debug_struct("MemoryObserver")
            .field("delay", &guard.delay)
            .field("watches", &guard.watches.len())
            .finish_non_exhaustive()
    }
}
