//! Wiring drivers into an orchestrator and running one action.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use brig_core::{ActionName, ServiceInstance};
use brig_driver_kube::{KubeCluster, KubePodExecutor, KubePodObserver, KubeSandboxProvider};
use brig_driver_memory::{MemoryCluster, MemoryExecutor, MemoryObserver, MemorySandbox};
use brig_runtime::{ActionOrchestrator, ActionOutcome, ActionStatus};
use brig_telemetry::{NoopTelemetry, TelemetryService};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::cli::OutputFormat;
use crate::config::BrigConfig;

const DRY_RUN_OUTPUT: &str = "dry run: no workload was started";

/// Build an orchestrator over in-memory drivers that pretend the
/// instance's namespace exists and every step succeeds.
pub fn dry_run_orchestrator(
    config: &BrigConfig,
    instance: &ServiceInstance,
    telemetry: Arc<dyn TelemetryService>,
) -> ActionOrchestrator {
    ActionOrchestrator::new(
        Arc::new(MemoryCluster::new().with_namespace(instance.namespace())),
        Arc::new(MemorySandbox::new()),
        Arc::new(MemoryExecutor::new()),
        Arc::new(MemoryObserver::new().succeeding_with(DRY_RUN_OUTPUT)),
        telemetry,
        config.orchestrator.clone(),
    )
}

/// Build an orchestrator over the Kubernetes drivers.
pub async fn cluster_orchestrator(
    config: &BrigConfig,
    telemetry: Arc<dyn TelemetryService>,
) -> anyhow::Result<ActionOrchestrator> {
    let client = brig_driver_kube::connect(config.cluster.context.as_deref())
        .await
        .context("connecting to the cluster")?;
    Ok(ActionOrchestrator::new(
        Arc::new(KubeCluster::new(client.clone())),
        Arc::new(KubeSandboxProvider::new(client.clone())),
        Arc::new(KubePodExecutor::new(client.clone())),
        Arc::new(KubePodObserver::new(client)),
        telemetry,
        config.orchestrator.clone(),
    ))
}

/// Run `action` against `instance`, print the outcome and pick the exit
/// code.
pub async fn run_action(
    config: &BrigConfig,
    action: &ActionName,
    instance: &ServiceInstance,
    dry_run: bool,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let telemetry: Arc<dyn TelemetryService> = NoopTelemetry::arc();
    let orchestrator = if dry_run {
        dry_run_orchestrator(config, instance, Arc::clone(&telemetry))
    } else {
        cluster_orchestrator(config, Arc::clone(&telemetry)).await?
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, abandoning watch");
            on_interrupt.cancel();
        }
    });

    let outcome = orchestrator
        .run_action_with_cancel(action, instance, &config.cluster, cancel)
        .await;
    for (name, value) in telemetry.metrics().counters() {
        tracing::debug!(metric = %name, value, "counter");
    }

    render(&outcome, output)?;
    Ok(match outcome.into_result() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    })
}

fn render(outcome: &ActionOutcome, output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Text => {
            if let Some(workload) = outcome.workload() {
                println!("{workload}");
            }
        }
        OutputFormat::Json => {
            let (status, detail) = match outcome.result() {
                Ok(ActionStatus::Completed { output }) => ("completed", json!({ "output": output })),
                Ok(ActionStatus::Skipped { namespace }) => {
                    ("skipped", json!({ "namespace": namespace }))
                }
                Err(e) => (
                    "failed",
                    json!({ "error": e.to_string(), "kind": e.kind().to_string() }),
                ),
            };
            let summary = json!({
                "workload": outcome.workload_or_empty(),
                "status": status,
                "detail": detail,
                "phases": outcome.phases(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
