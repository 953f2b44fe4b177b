#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Kubernetes Driver
//!
//! Implements the Brig ports against a Kubernetes cluster:
//!
//! - [`KubeCluster`] -- namespace lookups via `Api<Namespace>`
//! - [`KubePodExecutor`] -- creates a service account, a role binding and
//!   a pod running `<image> <action> --extra-vars <json>`
//! - [`KubePodObserver`] -- polls the pod phase and collects its logs
//! - [`KubeSandboxProvider`] -- deletes what the executor created
//!
//! # Examples
//!
//! ```rust,ignore
//! use brig_driver_kube::{connect, KubeCluster, KubePodExecutor};
//!
//! let client = connect(None).await?;
//! let cluster = KubeCluster::new(client.clone());
//! let executor = KubePodExecutor::new(client);
//! ```

mod cluster;
mod error;
mod executor;
#[cfg(test)]
mod mock;
mod observer;
mod sandbox;

use brig_ports::PortsError;
use kube::Client;
use kube::config::{Config, KubeConfigOptions};

pub use cluster::KubeCluster;
pub use error::map_kube_error;
pub use executor::{
    KubePodExecutor, build_pod, build_role_binding, build_service_account, workload_name,
};
pub use observer::KubePodObserver;
pub use sandbox::{KubeSandboxManager, KubeSandboxProvider};

/// Label put on every object the drivers create.
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value of [`MANAGED_BY_LABEL`].
pub const MANAGED_BY: &str = "brig";

/// Build a client for the given kubeconfig context.
///
/// `None` infers the configuration: in-cluster when running in a pod,
/// otherwise the current kubeconfig context.
pub async fn connect(context: Option<&str>) -> Result<Client, PortsError> {
    let config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_owned()),
                ..KubeConfigOptions::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| PortsError::Connection(format!("kubeconfig context {context}: {e}")))?
        }
        None => Config::infer()
            .await
            .map_err(|e| PortsError::Connection(format!("infer cluster config: {e}")))?,
    };
    tracing::debug!(
        cluster_url = %config.cluster_url,
        namespace = %config.default_namespace,
        "cluster config loaded"
    );
    Client::try_from(config).map_err(|e| PortsError::Connection(e.to_string()))
}
