//! Pod phase polling.

use std::time::Duration;

use async_trait::async_trait;
use brig_ports::{PortsError, WatchFailure, WorkloadObserver};
use k8s_openapi::api::core::v1::Pod;
use kube::api::LogParams;
use kube::{Api, Client};

use crate::error::map_kube_error;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Terminal state of a pod, as far as the observer cares.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PodPhase {
    Succeeded,
    Failed(String),
    Running,
}

fn classify(pod: &Pod) -> PodPhase {
    let status = pod.status.as_ref();
    match status.and_then(|s| s.phase.as_deref()) {
        Some("Succeeded") => PodPhase::Succeeded,
        Some("Failed") => {
            let reason = status
                .and_then(|s| s.reason.clone().or_else(|| s.message.clone()))
                .unwrap_or_else(|| "Failed".to_owned());
            PodPhase::Failed(reason)
        }
        _ => PodPhase::Running,
    }
}

/// [`WorkloadObserver`] that polls the pod until it succeeds or fails.
///
/// Has no deadline of its own; the orchestrator bounds the watch.
#[derive(Clone)]
pub struct KubePodObserver {
    client: Client,
    poll_interval: Duration,
}

impl KubePodObserver {
    /// Create an observer polling every two seconds.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn logs(&self, pods: &Api<Pod>, workload: &str) -> String {
        match pods.logs(workload, &LogParams::default()).await {
            Ok(logs) => logs,
            Err(e) => {
                tracing::warn!(workload, error = %e, "could not read pod logs");
                String::new()
            }
        }
    }
}

#[async_trait]
impl WorkloadObserver for KubePodObserver {
    async fn watch(&self, workload: &str, namespace: &str) -> Result<String, WatchFailure> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            let pod = pods
                .get(workload)
                .await
                .map_err(|e| map_kube_error(e, "Pod", workload))?;
            match classify(&pod) {
                PodPhase::Running => {
                    tracing::trace!(workload, "pod still running");
                }
                PodPhase::Succeeded => return Ok(self.logs(&pods, workload).await),
                PodPhase::Failed(reason) => {
                    let output = self.logs(&pods, workload).await;
                    return Err(WatchFailure::with_output(
                        PortsError::workload_failed(workload, reason),
                        output,
                    ));
                }
            }
        }
    }
}

impl std::fmt::Debug for KubePodObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePodObserver")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;

    fn pod(phase: Option<&str>, reason: Option<&str>) -> Pod {
        Pod {
            status: Some(PodStatus {
                phase: phase.map(str::to_owned),
                reason: reason.map(str::to_owned),
                ..PodStatus::default()
            }),
            ..Pod::default()
        }
    }

    #[test]
    fn classifies_phases() {
        assert_eq!(classify(&pod(Some("Succeeded"), None)), PodPhase::Succeeded);
        assert_eq!(classify(&pod(Some("Running"), None)), PodPhase::Running);
        assert_eq!(classify(&pod(Some("Pending"), None)), PodPhase::Running);
        assert_eq!(classify(&pod(None, None)), PodPhase::Running);
        assert_eq!(classify(&Pod::default()), PodPhase::Running);
    }

    #[test]
    fn failed_pod_carries_reason() {
        assert_eq!(
            classify(&pod(Some("Failed"), Some("DeadlineExceeded"))),
            PodPhase::Failed("DeadlineExceeded".to_owned())
        );
        assert_eq!(
            classify(&pod(Some("Failed"), None)),
            PodPhase::Failed("Failed".to_owned())
        );
    }
}
