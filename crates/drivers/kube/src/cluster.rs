//! Namespace lookups.

use async_trait::async_trait;
use brig_ports::{ClusterClient, NamespacePhase, NamespaceState, PortsError};
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};

use crate::error::map_kube_error;

/// [`ClusterClient`] over the Kubernetes API.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Create a cluster client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterClient for KubeCluster {
    async fn get_namespace(&self, name: &str) -> Result<NamespaceState, PortsError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespace = api
            .get_opt(name)
            .await
            .map_err(|e| map_kube_error(e, "Namespace", name))?;
        Ok(match namespace {
            None => NamespaceState::Absent,
            Some(ns) => {
                let phase = ns.status.as_ref().and_then(|s| s.phase.as_deref());
                NamespaceState::Present(NamespacePhase::from_phase(phase))
            }
        })
    }
}

impl std::fmt::Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster").finish_non_exhaustive()
    }
}
