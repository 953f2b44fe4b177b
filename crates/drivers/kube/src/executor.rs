//! Pod-based workload executor.

use std::collections::BTreeMap;

use async_trait::async_trait;
use brig_core::{
    ActionName, ClusterConfig, ExecutionContext, InstanceContext, Parameters, ServiceSpec,
};
use brig_ports::{PortsError, Submission, WorkloadExecutor};
use k8s_openapi::api::core::v1::{Container, EnvVar, Pod, PodSpec, ServiceAccount};
use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::PostParams;
use kube::{Api, Client};

use crate::error::map_kube_error;
use crate::{MANAGED_BY, MANAGED_BY_LABEL};

const CONTAINER_NAME: &str = "brig-action";
const ACTION_LABEL: &str = "brig.io/action";
// Keeps `brig-<action>-<suffix>` within the 63 character name limit.
const MAX_ACTION_IN_NAME: usize = 48;

/// Name for a new workload running `action`.
///
/// Kubernetes object names allow no underscores, and the suffix keeps
/// concurrent runs of the same action apart.
pub fn workload_name(action: &ActionName) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let action = action.as_str().replace('_', "-");
    let action = &action[..action.len().min(MAX_ACTION_IN_NAME)];
    format!("brig-{action}-{}", &suffix[..8])
}

fn metadata(name: &str, namespace: &str, action: &ActionName) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_owned()),
        namespace: Some(namespace.to_owned()),
        labels: Some(BTreeMap::from([
            (MANAGED_BY_LABEL.to_owned(), MANAGED_BY.to_owned()),
            (ACTION_LABEL.to_owned(), action.as_str().to_owned()),
        ])),
        ..ObjectMeta::default()
    }
}

/// The service account a workload runs under.
pub fn build_service_account(name: &str, namespace: &str, action: &ActionName) -> ServiceAccount {
    ServiceAccount {
        metadata: metadata(name, namespace, action),
        ..ServiceAccount::default()
    }
}

/// Binds `config.sandbox_role` to the workload's service account inside
/// its namespace.
pub fn build_role_binding(
    name: &str,
    namespace: &str,
    action: &ActionName,
    config: &ClusterConfig,
) -> RoleBinding {
    RoleBinding {
        metadata: metadata(name, namespace, action),
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_owned(),
            kind: "ClusterRole".to_owned(),
            name: config.sandbox_role.clone(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_owned(),
            name: name.to_owned(),
            namespace: Some(namespace.to_owned()),
            ..Subject::default()
        }]),
    }
}

/// The pod running `<image> <action> --extra-vars <extra_vars>`.
pub fn build_pod(
    name: &str,
    namespace: &str,
    action: &ActionName,
    image: &str,
    extra_vars: &str,
    config: &ClusterConfig,
) -> Pod {
    let env = |key: &str, value: &str| EnvVar {
        name: key.to_owned(),
        value: Some(value.to_owned()),
        ..EnvVar::default()
    };
    Pod {
        metadata: metadata(name, namespace, action),
        spec: Some(PodSpec {
            service_account_name: Some(name.to_owned()),
            restart_policy: Some("Never".to_owned()),
            containers: vec![Container {
                name: CONTAINER_NAME.to_owned(),
                image: Some(image.to_owned()),
                image_pull_policy: Some(config.pull_policy.as_str().to_owned()),
                args: Some(vec![
                    action.as_str().to_owned(),
                    "--extra-vars".to_owned(),
                    extra_vars.to_owned(),
                ]),
                env: Some(vec![env("POD_NAME", name), env("POD_NAMESPACE", namespace)]),
                ..Container::default()
            }],
            ..PodSpec::default()
        }),
        ..Pod::default()
    }
}

/// [`WorkloadExecutor`] that runs each action in its own pod.
#[derive(Clone)]
pub struct KubePodExecutor {
    client: Client,
}

impl KubePodExecutor {
    /// Create an executor.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WorkloadExecutor for KubePodExecutor {
    async fn execute(
        &self,
        action: &ActionName,
        config: &ClusterConfig,
        spec: &ServiceSpec,
        context: &InstanceContext,
        parameters: &Parameters,
    ) -> Submission {
        let namespace = context.namespace.as_str();
        let extra_vars = match serde_json::to_string(&parameters.to_json()) {
            Ok(json) => json,
            Err(e) => return Submission::failed(e.into()),
        };
        let name = workload_name(action);
        let post = PostParams::default();

        let accounts: Api<ServiceAccount> = Api::namespaced(self.client.clone(), namespace);
        if let Err(e) = accounts
            .create(&post, &build_service_account(&name, namespace, action))
            .await
        {
            return Submission::failed(map_kube_error(e, "ServiceAccount", &name));
        }
        // From here on something exists that teardown must remove.
        let execution =
            ExecutionContext::new(name.clone(), namespace).with_service_account(name.clone());

        let bindings: Api<RoleBinding> = Api::namespaced(self.client.clone(), namespace);
        if let Err(e) = bindings
            .create(&post, &build_role_binding(&name, namespace, action, config))
            .await
        {
            return Submission::failed_with(execution, map_kube_error(e, "RoleBinding", &name));
        }

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = build_pod(&name, namespace, action, &spec.image, &extra_vars, config);
        if let Err(e) = pods.create(&post, &pod).await {
            return Submission::failed_with(execution, map_kube_error(e, "Pod", &name));
        }

        tracing::info!(workload = %name, namespace, image = %spec.image, "pod created");
        Submission::Submitted(execution)
    }
}

impl std::fmt::Debug for KubePodExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePodExecutor").finish_non_exhaustive()
    }
}
