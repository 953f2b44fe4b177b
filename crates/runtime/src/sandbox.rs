//! Scoped sandbox acquisition with exactly-once teardown.

use std::sync::Arc;

use brig_core::{ClusterConfig, ExecutionContext, ServiceInstance};
use brig_ports::{PortsError, SandboxManager, SandboxProvider};
use brig_telemetry::{ActionEvent, TelemetryService, names};

/// Holds the sandbox manager of one action run and guarantees that
/// `destroy` is invoked exactly once.
///
/// Call [`release`](Self::release) on every normal exit path. If the scope
/// is dropped without being released (the run future was dropped or a
/// collaborator panicked), teardown is spawned onto the current tokio
/// runtime instead.
pub struct SandboxScope {
    inner: Option<ScopeInner>,
}

struct ScopeInner {
    manager: Arc<dyn SandboxManager>,
    config: ClusterConfig,
    context: Option<ExecutionContext>,
    telemetry: Arc<dyn TelemetryService>,
}

impl SandboxScope {
    /// Construct a sandbox manager for `instance` and open the scope.
    pub fn acquire(
        provider: &dyn SandboxProvider,
        instance: &ServiceInstance,
        config: ClusterConfig,
        telemetry: Arc<dyn TelemetryService>,
    ) -> Self {
        let manager = provider.manager(instance);
        telemetry.metrics().gauge(names::ACTIONS_IN_FLIGHT).inc();
        tracing::debug!(instance_id = %instance.id(), "sandbox acquired");
        Self {
            inner: Some(ScopeInner {
                manager,
                config,
                context: None,
                telemetry,
            }),
        }
    }

    /// Remember the execution context teardown should act on.
    pub fn track(&mut self, context: ExecutionContext) {
        if let Some(inner) = self.inner.as_mut() {
            inner.context = Some(context);
        }
    }

    /// The tracked execution context, if any.
    pub fn context(&self) -> Option<&ExecutionContext> {
        self.inner.as_ref().and_then(|inner| inner.context.as_ref())
    }

    /// Tear the sandbox down now.
    ///
    /// Teardown runs as its own task, so dropping the caller while
    /// `destroy` is pending does not abandon it halfway.
    ///
    /// The error is returned for inspection only; it has already been
    /// logged and counted.
    pub async fn release(mut self) -> Result<(), PortsError> {
        let Some(inner) = self.inner.take() else {
            return Ok(());
        };
        match tokio::spawn(inner.teardown()).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "sandbox teardown task did not complete");
                Err(PortsError::Internal(format!("sandbox teardown: {e}")))
            }
        }
    }
}

impl ScopeInner {
    async fn teardown(self) -> Result<(), PortsError> {
        let Self {
            manager,
            config,
            context,
            telemetry,
        } = self;
        let metrics = telemetry.metrics();
        metrics.counter(names::SANDBOX_TEARDOWNS).inc();

        let result = manager.destroy(context.as_ref(), &config).await;
        metrics.gauge(names::ACTIONS_IN_FLIGHT).dec();

        let workload = context.map(|c| c.workload);
        match &result {
            Ok(()) => tracing::debug!(workload = ?workload, "sandbox destroyed"),
            Err(e) => {
                tracing::warn!(workload = ?workload, error = %e, "sandbox teardown failed");
                metrics.counter(names::SANDBOX_TEARDOWN_FAILURES).inc();
                telemetry.event_bus().emit(ActionEvent::TeardownFailed {
                    workload,
                    error: e.to_string(),
                });
            }
        }
        result
    }
}

impl Drop for SandboxScope {
    fn drop(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    workload = ?inner.context.as_ref().map(|c| c.workload.as_str()),
                    "sandbox scope dropped before release, scheduling teardown"
                );
                handle.spawn(async move {
                    let _ = inner.teardown().await;
                });
            }
            Err(_) => {
                tracing::error!(
                    workload = ?inner.context.as_ref().map(|c| c.workload.as_str()),
                    "sandbox scope dropped outside a tokio runtime, teardown skipped"
                );
                let metrics = inner.telemetry.metrics();
                metrics.gauge(names::ACTIONS_IN_FLIGHT).dec();
                metrics.counter(names::SANDBOX_TEARDOWN_FAILURES).inc();
            }
        }
    }
}

impl std::fmt::Debug for SandboxScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxScope")
            .field("released", &self.inner.is_none())
            .field("context", &self.context())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brig_core::{InstanceContext, InstanceId, ServiceSpec};
    use brig_driver_memory::MemorySandbox;
    use brig_telemetry::NoopTelemetry;
    use std::time::Duration;

    fn instance() -> ServiceInstance {
        ServiceInstance::new(
            ServiceSpec::new(InstanceId::v4(), "mysql-apb", "docker.io/example/mysql-apb:latest"),
            InstanceContext::kubernetes("db"),
        )
    }

    fn telemetry() -> Arc<NoopTelemetry> {
        Arc::new(NoopTelemetry::new())
    }

    #[tokio::test]
    async fn release_destroys_once_with_tracked_context() {
        let sandbox = MemorySandbox::new();
        let telemetry = telemetry();
        let mut scope =
            SandboxScope::acquire(&sandbox, &instance(), ClusterConfig::default(), telemetry.clone());
        assert_eq!(telemetry.metrics().gauge(names::ACTIONS_IN_FLIGHT).get(), 1);

        scope.track(ExecutionContext::new("pod-1", "db"));
        scope.release().await.unwrap();

        let calls = sandbox.destroy_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].as_ref().map(|c| c.workload.as_str()), Some("pod-1"));
        assert_eq!(telemetry.metrics().gauge(names::ACTIONS_IN_FLIGHT).get(), 0);
        assert_eq!(telemetry.metrics().counter(names::SANDBOX_TEARDOWNS).get(), 1);
    }

    #[tokio::test]
    async fn release_without_context_passes_none() {
        let sandbox = MemorySandbox::new();
        let scope = SandboxScope::acquire(&sandbox, &instance(), ClusterConfig::default(), telemetry());
        scope.release().await.unwrap();
        assert_eq!(sandbox.destroy_calls(), vec![None]);
    }

    #[tokio::test]
    async fn teardown_failure_is_counted_and_announced() {
        let sandbox =
            MemorySandbox::new().failing_with(|| PortsError::PermissionDenied("rolebindings".into()));
        let telemetry = telemetry();
        let mut sub = telemetry.event_bus().subscribe();
        let scope =
            SandboxScope::acquire(&sandbox, &instance(), ClusterConfig::default(), telemetry.clone());

        let err = scope.release().await.unwrap_err();
        assert!(matches!(err, PortsError::PermissionDenied(_)));
        assert_eq!(
            telemetry.metrics().counter(names::SANDBOX_TEARDOWN_FAILURES).get(),
            1
        );
        assert!(matches!(
            sub.try_recv(),
            Some(ActionEvent::TeardownFailed { workload: None, .. })
        ));
    }

    #[tokio::test]
    async fn drop_schedules_teardown() {
        let sandbox = MemorySandbox::new();
        {
            let mut scope =
                SandboxScope::acquire(&sandbox, &instance(), ClusterConfig::default(), telemetry());
            scope.track(ExecutionContext::new("pod-9", "db"));
        }
        for _ in 0..50 {
            if !sandbox.destroy_calls().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let calls = sandbox.destroy_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].as_ref().map(|c| c.workload.as_str()), Some("pod-9"));
    }

    #[test]
    fn drop_outside_runtime_counts_failure() {
        let sandbox = MemorySandbox::new();
        let telemetry = telemetry();
        let scope =
            SandboxScope::acquire(&sandbox, &instance(), ClusterConfig::default(), telemetry.clone());
        drop(scope);
        assert!(sandbox.destroy_calls().is_empty());
        assert_eq!(
            telemetry.metrics().counter(names::SANDBOX_TEARDOWN_FAILURES).get(),
            1
        );
        assert_eq!(telemetry.metrics().gauge(names::ACTIONS_IN_FLIGHT).get(), 0);
    }
}
