//! Sandbox teardown.

use std::sync::Arc;

use async_trait::async_trait;
use brig_core::{ClusterConfig, ExecutionContext, InstanceId, ServiceInstance};
use brig_ports::{PortsError, SandboxManager, SandboxProvider};
use k8s_openapi::api::core::v1::{Pod, ServiceAccount};
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::api::DeleteParams;
use kube::{Api, Client, Resource};

use crate::error::{is_not_found, map_kube_error};

/// Hands out a [`KubeSandboxManager`] per action run.
#[derive(Clone)]
pub struct KubeSandboxProvider {
    client: Client,
}

impl KubeSandboxProvider {
    /// Create a provider.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl SandboxProvider for KubeSandboxProvider {
    fn manager(&self, instance: &ServiceInstance) -> Arc<dyn SandboxManager> {
        Arc::new(KubeSandboxManager {
            client: self.client.clone(),
            instance_id: instance.id(),
        })
    }
}

/// Deletes the role binding, service account and (unless kept) pod of one
/// run. Objects that are already gone count as deleted.
pub struct KubeSandboxManager {
    client: Client,
    instance_id: InstanceId,
}

impl KubeSandboxManager {
    async fn delete<K>(&self, namespace: &str, name: &str) -> Result<(), PortsError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + std::fmt::Debug
            + serde::de::DeserializeOwned,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let kind = K::kind(&K::DynamicType::default()).into_owned();
        match api.delete(name, &DeleteParams::background()).await {
            Ok(_) => {
                tracing::debug!(kind = %kind, name, namespace, "deleted");
                Ok(())
            }
            Err(e) if is_not_found(&e) => {
                tracing::debug!(kind = %kind, name, namespace, "already gone");
                Ok(())
            }
            Err(e) => Err(map_kube_error(e, &kind, name)),
        }
    }
}

#[async_trait]
impl SandboxManager for KubeSandboxManager {
    async fn destroy(
        &self,
        context: Option<&ExecutionContext>,
        config: &ClusterConfig,
    ) -> Result<(), PortsError> {
        let Some(context) = context else {
            tracing::debug!(instance_id = %self.instance_id, "nothing to tear down");
            return Ok(());
        };
        let namespace = context.namespace.as_str();
        let account = context
            .service_account
            .as_deref()
            .unwrap_or(context.workload.as_str());

        // Try everything, report the first failure.
        let mut results = vec![
            self.delete::<RoleBinding>(namespace, account).await,
            self.delete::<ServiceAccount>(namespace, account).await,
        ];
        if !config.keep_workload {
            results.push(self.delete::<Pod>(namespace, &context.workload).await);
        }
        results.into_iter().collect()
    }
}

impl std::fmt::Debug for KubeSandboxProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSandboxProvider").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for KubeSandboxManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSandboxManager")
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use brig_core::{InstanceContext, ServiceSpec};
    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn manager(client: Client) -> Arc<dyn SandboxManager> {
        let instance = ServiceInstance::new(
            ServiceSpec::new(InstanceId::v4(), "mysql-apb", "docker.io/example/mysql-apb:latest"),
            InstanceContext::kubernetes("db"),
        );
        KubeSandboxProvider::new(client).manager(&instance)
    }

    fn not_found(what: &str) -> serde_json::Value {
        mock::refusal(404, "NotFound", &format!("{what} \"brig-x\" not found"))
    }

    #[tokio::test]
    async fn nothing_named_sends_no_requests() {
        let (client, mut api) = mock::client();
        manager(client)
            .destroy(None, &ClusterConfig::default())
            .await
            .unwrap();

        let next = tokio::time::timeout(Duration::from_millis(50), api.next_request()).await;
        assert!(!matches!(next, Ok(Some(_))));
    }

    #[tokio::test]
    async fn already_gone_objects_count_as_deleted() {
        let (client, mut api) = mock::client();
        let server = tokio::spawn(async move {
            vec![
                mock::respond(&mut api, StatusCode::NOT_FOUND, &not_found("rolebindings")).await,
                mock::respond(&mut api, StatusCode::OK, &ServiceAccount::default()).await,
                mock::respond(&mut api, StatusCode::NOT_FOUND, &not_found("pods")).await,
            ]
        });

        let context = ExecutionContext::new("brig-x", "db").with_service_account("brig-x");
        manager(client)
            .destroy(Some(&context), &ClusterConfig::default())
            .await
            .unwrap();

        assert_eq!(
            server.await.unwrap(),
            vec![
                (
                    Method::DELETE,
                    "/apis/rbac.authorization.k8s.io/v1/namespaces/db/rolebindings/brig-x"
                        .to_owned()
                ),
                (Method::DELETE, "/api/v1/namespaces/db/serviceaccounts/brig-x".to_owned()),
                (Method::DELETE, "/api/v1/namespaces/db/pods/brig-x".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn refusal_is_reported_after_trying_the_rest() {
        let (client, mut api) = mock::client();
        let server = tokio::spawn(async move {
            vec![
                mock::respond(
                    &mut api,
                    StatusCode::FORBIDDEN,
                    &mock::refusal(403, "Forbidden", "rolebindings is forbidden"),
                )
                .await,
                mock::respond(&mut api, StatusCode::OK, &ServiceAccount::default()).await,
            ]
        });

        let context = ExecutionContext::new("brig-x", "db").with_service_account("brig-x");
        let config = ClusterConfig {
            keep_workload: true,
            ..ClusterConfig::default()
        };
        let err = manager(client)
            .destroy(Some(&context), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, PortsError::PermissionDenied(_)));
        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].1, "/api/v1/namespaces/db/serviceaccounts/brig-x");
    }
}
