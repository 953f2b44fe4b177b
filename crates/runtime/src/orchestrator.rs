//! The action orchestrator.
//!
//! One run walks validate, check namespace, acquire sandbox, execute,
//! observe, tear down and report. Once the sandbox is acquired, teardown
//! happens on every exit path; see [`SandboxScope`].

use std::sync::Arc;
use std::time::Instant;

use brig_core::{ActionName, ClusterConfig, CoreError, ExecutionContext, ServiceInstance};
use brig_ports::{
    ClusterClient, NamespaceState, PortsError, SandboxProvider, WatchFailure,
    WorkloadExecutor, WorkloadObserver,
};
use brig_telemetry::{ActionEvent, TelemetryService, names};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::{OrchestratorConfig, TerminatingNamespacePolicy};
use crate::error::OrchestratorError;
use crate::namespace::NamespaceOracle;
use crate::outcome::{ActionOutcome, ActionStatus};
use crate::phase::{ActionPhase, PhaseTrail};
use crate::sandbox::SandboxScope;

/// Runs actions against service instances inside ephemeral sandboxes.
///
/// Holds only shared, immutable collaborators, so a single orchestrator
/// can serve concurrent runs.
///
/// # Examples
///
/// ```ignore
/// let orchestrator = ActionOrchestrator::new(
///     cluster, sandboxes, executor, observer, telemetry,
///     OrchestratorConfig::default(),
/// );
/// let outcome = orchestrator.deprovision(&instance, &ClusterConfig::default()).await;
/// println!("workload: {}", outcome.workload_or_empty());
/// ```
pub struct ActionOrchestrator {
    oracle: NamespaceOracle,
    sandboxes: Arc<dyn SandboxProvider>,
    executor: Arc<dyn WorkloadExecutor>,
    observer: Arc<dyn WorkloadObserver>,
    telemetry: Arc<dyn TelemetryService>,
    config: OrchestratorConfig,
}

impl ActionOrchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        cluster: Arc<dyn ClusterClient>,
        sandboxes: Arc<dyn SandboxProvider>,
        executor: Arc<dyn WorkloadExecutor>,
        observer: Arc<dyn WorkloadObserver>,
        telemetry: Arc<dyn TelemetryService>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            oracle: NamespaceOracle::new(cluster),
            sandboxes,
            executor,
            observer,
            telemetry,
            config,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The telemetry service events and metrics go to.
    pub fn telemetry(&self) -> &Arc<dyn TelemetryService> {
        &self.telemetry
    }

    /// Run the `deprovision` action against `instance`.
    pub async fn deprovision(
        &self,
        instance: &ServiceInstance,
        cluster: &ClusterConfig,
    ) -> ActionOutcome {
        self.run_action(&ActionName::deprovision(), instance, cluster)
            .await
    }

    /// Run `action` against `instance`.
    pub async fn run_action(
        &self,
        action: &ActionName,
        instance: &ServiceInstance,
        cluster: &ClusterConfig,
    ) -> ActionOutcome {
        self.run_action_with_cancel(action, instance, cluster, CancellationToken::new())
            .await
    }

    /// Run `action` against `instance`, giving up the watch once `cancel`
    /// fires.
    ///
    /// Cancellation only bounds observation. The sandbox is still torn
    /// down before this returns.
    pub async fn run_action_with_cancel(
        &self,
        action: &ActionName,
        instance: &ServiceInstance,
        cluster: &ClusterConfig,
        cancel: CancellationToken,
    ) -> ActionOutcome {
        let span = tracing::info_span!(
            "run_action",
            action = %action,
            instance_id = %instance.id(),
            namespace = %instance.namespace(),
        );
        self.run(action, instance, cluster, &cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        action: &ActionName,
        instance: &ServiceInstance,
        cluster: &ClusterConfig,
        cancel: &CancellationToken,
    ) -> ActionOutcome {
        let mut trail = PhaseTrail::new();
        log_banner(action, instance);

        if let Err(e) = self.validate(instance) {
            tracing::error!(error = %e, "instance failed validation");
            trail.advance(ActionPhase::Done);
            return self.finish_early(action, e.into(), trail);
        }

        trail.advance(ActionPhase::CheckingNamespace);
        let namespace = instance.namespace();
        let state = match self.oracle.state(namespace).await {
            Ok(state) => state,
            Err(source) => {
                tracing::error!(error = %source, "namespace lookup failed");
                trail.advance(ActionPhase::Done);
                let err = OrchestratorError::ClusterQuery {
                    namespace: namespace.to_owned(),
                    source,
                };
                return self.finish_early(action, err, trail);
            }
        };

        if self.should_skip(&state) {
            tracing::info!(?state, "namespace is gone, skipping action");
            trail.advance(ActionPhase::ShortCircuitDone);
            self.telemetry
                .metrics()
                .counter_with(names::ACTIONS_SKIPPED, "action", action.as_str())
                .inc();
            self.telemetry
                .event_bus()
                .emit(ActionEvent::NamespaceSkipped {
                    action: action.to_string(),
                    namespace: namespace.to_owned(),
                });
            let status = ActionStatus::Skipped {
                namespace: namespace.to_owned(),
            };
            return ActionOutcome::new(None, Ok(status), trail.into_vec());
        }
        if state.is_gone() {
            tracing::warn!("namespace is terminating, running action anyway");
        }

        trail.advance(ActionPhase::AcquiringSandbox);
        let started = Instant::now();
        let mut scope = SandboxScope::acquire(
            self.sandboxes.as_ref(),
            instance,
            cluster.clone(),
            Arc::clone(&self.telemetry),
        );
        self.telemetry.action_started(action.as_str());
        self.telemetry.event_bus().emit(ActionEvent::Started {
            action: action.to_string(),
            instance_id: instance.id().to_string(),
        });

        trail.advance(ActionPhase::Executing);
        let result = self
            .execute_and_observe(action, instance, cluster, cancel, &mut scope, &mut trail)
            .await;

        debug_assert!(trail.current().holds_sandbox());
        let workload = scope.context().map(|c| c.workload.clone());
        // Teardown errors are logged and counted by the scope.
        let _ = scope.release().await;
        trail.advance(ActionPhase::TornDown);
        trail.advance(ActionPhase::Done);

        let elapsed = started.elapsed();
        self.telemetry
            .metrics()
            .histogram_with(names::ACTION_DURATION, "action", action.as_str())
            .observe(elapsed.as_secs_f64());

        match &result {
            Ok(_) => {
                tracing::info!(workload = ?workload, ?elapsed, "action completed");
                self.telemetry
                    .metrics()
                    .counter_with(names::ACTIONS_SUCCEEDED, "action", action.as_str())
                    .inc();
                self.telemetry.event_bus().emit(ActionEvent::Completed {
                    action: action.to_string(),
                    workload: workload.clone().unwrap_or_default(),
                    duration: elapsed,
                });
            }
            Err(e) => self.report_failure(action, workload.clone(), e),
        }

        ActionOutcome::new(workload, result, trail.into_vec())
    }

    async fn execute_and_observe(
        &self,
        action: &ActionName,
        instance: &ServiceInstance,
        cluster: &ClusterConfig,
        cancel: &CancellationToken,
        scope: &mut SandboxScope,
        trail: &mut PhaseTrail,
    ) -> Result<ActionStatus, OrchestratorError> {
        let submission = self
            .executor
            .execute(
                action,
                cluster,
                &instance.spec,
                &instance.context,
                &instance.parameters,
            )
            .await;

        if let Some(context) = submission.context() {
            scope.track(context.clone());
        }
        let context = match submission.into_result() {
            Ok(context) => context,
            Err((context, error)) => {
                let workload = context.map(|c| c.workload);
                tracing::error!(workload = ?workload, error = %error, "problem executing action");
                return Err(OrchestratorError::Execution {
                    action: action.clone(),
                    namespace: instance.namespace().to_owned(),
                    workload,
                    source: error,
                });
            }
        };
        tracing::info!(workload = %context.workload, "workload submitted");
        self.telemetry.event_bus().emit(ActionEvent::Submitted {
            action: action.to_string(),
            workload: context.workload.clone(),
            namespace: context.namespace.clone(),
        });

        trail.advance(ActionPhase::Observing);
        match self.observe(&context, cancel).await {
            Ok(output) => {
                tracing::debug!(workload = %context.workload, %output, "workload output");
                Ok(ActionStatus::Completed { output })
            }
            Err(failure) => {
                if !failure.output.is_empty() {
                    tracing::info!(
                        workload = %context.workload,
                        output = %failure.output,
                        "partial workload output"
                    );
                }
                tracing::error!(
                    workload = %context.workload,
                    error = %failure.error,
                    "error watching workload"
                );
                Err(OrchestratorError::Observation {
                    workload: context.workload,
                    namespace: context.namespace,
                    source: failure.error,
                })
            }
        }
    }

    async fn observe(
        &self,
        context: &ExecutionContext,
        cancel: &CancellationToken,
    ) -> Result<String, WatchFailure> {
        let timeout = self.config.watch_timeout;
        let operation = format!("watch {}", context.workload);
        let watch = self.observer.watch(&context.workload, &context.namespace);

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PortsError::cancelled(operation).into()),
            watched = tokio::time::timeout(timeout, watch) => match watched {
                Ok(result) => result,
                Err(_) => Err(PortsError::timeout(operation, timeout).into()),
            },
        }
    }

    fn validate(&self, instance: &ServiceInstance) -> Result<(), CoreError> {
        instance.validate()?;
        if self.config.require_namespace {
            instance.validate_namespace()?;
        }
        Ok(())
    }

    fn should_skip(&self, state: &NamespaceState) -> bool {
        match state {
            NamespaceState::Absent => true,
            NamespaceState::Present(phase) if phase.is_terminating() => {
                self.config.terminating_namespace == TerminatingNamespacePolicy::Skip
            }
            NamespaceState::Present(_) => false,
        }
    }

    fn finish_early(
        &self,
        action: &ActionName,
        err: OrchestratorError,
        trail: PhaseTrail,
    ) -> ActionOutcome {
        self.report_failure(action, None, &err);
        ActionOutcome::new(None, Err(err), trail.into_vec())
    }

    fn report_failure(&self, action: &ActionName, workload: Option<String>, err: &OrchestratorError) {
        self.telemetry
            .metrics()
            .counter_with(names::ACTIONS_FAILED, "action", action.as_str())
            .inc();
        self.telemetry.event_bus().emit(ActionEvent::Failed {
            action: action.to_string(),
            workload,
            error: err.to_string(),
        });
    }
}

impl std::fmt::Debug for ActionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn log_banner(action: &ActionName, instance: &ServiceInstance) {
    let spec = &instance.spec;
    tracing::info!(
        action = %action,
        instance_id = %spec.id,
        fq_name = %spec.fq_name,
        image = %spec.image,
        description = %spec.description,
        "running action"
    );
}
