//! In-memory workload executor.

use std::sync::Arc;

use async_trait::async_trait;
use brig_core::{
    ActionName, ClusterConfig, ExecutionContext, InstanceContext, Parameters, ServiceSpec,
};
use brig_ports::{PortsError, Submission, WorkloadExecutor};
use parking_lot::Mutex;

use crate::ErrorFactory;

/// One recorded call to [`MemoryExecutor::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteCall {
    /// Action that was submitted.
    pub action: ActionName,
    /// Image the workload was asked to run.
    pub image: String,
    /// Target namespace.
    pub namespace: String,
    /// Parameters handed over.
    pub parameters: Parameters,
}

#[derive(Clone, Default)]
enum Script {
    #[default]
    Submit,
    FailAfterNaming(ErrorFactory),
    FailBeforeNaming(ErrorFactory),
    Panic,
}

#[derive(Default)]
struct State {
    script: Script,
    workload_name: Option<String>,
    service_account: Option<String>,
    calls: Vec<ExecuteCall>,
}

/// Executor that pretends to submit workloads.
///
/// Workloads are named `brig-<action>-<n>` unless a fixed name is set with
/// [`named`](Self::named).
#[derive(Clone, Default)]
pub struct MemoryExecutor {
    state: Arc<Mutex<State>>,
}

impl MemoryExecutor {
    /// Create an executor that submits successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every workload this name.
    pub fn named(self, workload: impl Into<String>) -> Self {
        self.state.lock().workload_name = Some(workload.into());
        self
    }

    /// Attach this service account to every execution context.
    pub fn with_service_account(self, service_account: impl Into<String>) -> Self {
        self.state.lock().service_account = Some(service_account.into());
        self
    }

    /// Name the workload, then fail submission.
    pub fn failing_after_naming<F>(self, failure: F) -> Self
    where
        F: Fn() -> PortsError + Send + Sync + 'static,
    {
        self.state.lock().script = Script::FailAfterNaming(Arc::new(failure));
        self
    }

    /// Fail submission before any workload is named.
    pub fn failing_before_naming<F>(self, failure: F) -> Self
    where
        F: Fn() -> PortsError + Send + Sync + 'static,
    {
        self.state.lock().script = Script::FailBeforeNaming(Arc::new(failure));
        self
    }

    /// Panic inside `execute`.
    pub fn panicking(self) -> Self {
        self.state.lock().script = Script::Panic;
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<ExecuteCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl WorkloadExecutor for MemoryExecutor {
    async fn execute(
        &self,
        action: &ActionName,
        _config: &ClusterConfig,
        spec: &ServiceSpec,
        context: &InstanceContext,
        parameters: &Parameters,
    ) -> Submission {
        let (script, execution) = {
            let mut guard = self.state.lock();
            guard.calls.push(ExecuteCall {
                action: action.clone(),
                image: spec.image.clone(),
                namespace: context.namespace.clone(),
                parameters: parameters.clone(),
            });
            let workload = guard
                .workload_name
                .clone()
                .unwrap_or_else(|| format!("brig-{action}-{}", guard.calls.len()));
            let mut execution = ExecutionContext::new(workload, context.namespace.clone());
            if let Some(sa) = &guard.service_account {
                execution = execution.with_service_account(sa.clone());
            }
            (guard.script.clone(), execution)
        };

        tracing::debug!(%action, workload = %execution.workload, "memory executor call");
        match script {
            Script::Submit => Submission::Submitted(execution),
            Script::FailAfterNaming(failure) => Submission::failed_with(execution, failure()),
            Script::FailBeforeNaming(failure) => Submission::failed(failure()),
            Script::Panic => panic!("memory executor scripted to panic"),
        }
    }
}

impl std::fmt::Debug for MemoryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        f.debug_struct("MemoryExecutor")
            .field("workload_name", &guard.workload_name)
            .field("calls", &guard.calls.len())
            .finish_non_exhaustive()
    }
}
