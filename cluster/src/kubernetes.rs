//! kube-rs backed implementations of the cluster seams.

use crate::client::ClusterClient;
use crate::convert::{deployment_snapshot, pod_snapshot, stamp_restart, stateful_set_snapshot};
use crate::error::{CredentialError, Result};
use crate::validator::{CredentialValidator, ValidatedCredential};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use kubeboard_core::{Credential, WorkloadSnapshot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Validates kubeconfig uploads and builds [`KubeCluster`] clients.
///
/// # Security
///
/// kube-rs honours `users[].user.exec` and `auth-provider` entries. A
/// kubeconfig uploaded with either runs its credential plugin as a process
/// on this server, with the server's privileges, on the first cluster call.
/// Only expose the dashboard to operators trusted to run commands on the
/// host. Such uploads are logged at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeconfigValidator;

impl KubeconfigValidator {
    /// Create a validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialValidator for KubeconfigValidator {
    async fn validate(
        &self,
        credential: &Credential,
    ) -> std::result::Result<ValidatedCredential, CredentialError> {
        let text = std::str::from_utf8(credential.as_bytes())
            .map_err(|e| CredentialError::InvalidCredential(e.to_string()))?;

        let kubeconfig = Kubeconfig::from_yaml(text)
            .map_err(|e| CredentialError::InvalidCredential(e.to_string()))?;
        let username = current_user(&kubeconfig);
        if let Some(plugin_user) = credential_plugin_user(&kubeconfig) {
            warn!(
                user = %plugin_user,
                "Uploaded kubeconfig uses an exec or auth-provider plugin that will run on this host"
            );
        }

        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| CredentialError::ConnectionConfig(e.to_string()))?;
        let cluster_url = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| CredentialError::ConnectionConfig(e.to_string()))?;

        debug!(user = %username, cluster = %cluster_url, "Kubeconfig validated");

        Ok(ValidatedCredential {
            client: Arc::new(KubeCluster::new(client)),
            username,
        })
    }
}

/// User of the current context, or an empty string when the kubeconfig does
/// not name one.
fn current_user(kubeconfig: &Kubeconfig) -> String {
    let Some(current) = kubeconfig.current_context.as_deref() else {
        return String::new();
    };

    kubeconfig
        .contexts
        .iter()
        .find(|named| named.name == current)
        .and_then(|named| named.context.as_ref())
        .and_then(|context| context.user.clone())
        .unwrap_or_default()
}

/// Name of the first user entry carrying an exec or auth-provider plugin.
fn credential_plugin_user(kubeconfig: &Kubeconfig) -> Option<&str> {
    kubeconfig
        .auth_infos
        .iter()
        .find(|named| {
            named
                .auth_info
                .as_ref()
                .is_some_and(|info| info.exec.is_some() || info.auth_provider.is_some())
        })
        .map(|named| named.name.as_str())
}

/// [`ClusterClient`] talking to a real API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Wrap a kube client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn namespaced<K>(&self, namespace: &str) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster").finish_non_exhaustive()
    }
}

#[async_trait]
impl ClusterClient for KubeCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let namespaces = Api::<Namespace>::all(self.client.clone())
            .list(&ListParams::default())
            .await?;

        Ok(namespaces
            .items
            .into_iter()
            .filter_map(|namespace| namespace.metadata.name)
            .collect())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>> {
        let list = self
            .namespaced::<Deployment>(namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(deployment_snapshot).collect())
    }

    async fn list_stateful_sets(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>> {
        let list = self
            .namespaced::<StatefulSet>(namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(stateful_set_snapshot).collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>> {
        let list = self
            .namespaced::<Pod>(namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(pod_snapshot).collect())
    }

    async fn restart_deployment(
        &self,
        namespace: &str,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let api = self.namespaced::<Deployment>(namespace);
        let mut deployment = api.get(name).await?;

        let spec = deployment.spec.get_or_insert_with(Default::default);
        stamp_restart(&mut spec.template, at);

        api.replace(name, &PostParams::default(), &deployment).await?;
        debug!(namespace, name, "Deployment restart requested");
        Ok(())
    }

    async fn restart_stateful_set(
        &self,
        namespace: &str,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let api = self.namespaced::<StatefulSet>(namespace);
        let mut stateful_set = api.get(name).await?;

        let spec = stateful_set.spec.get_or_insert_with(Default::default);
        stamp_restart(&mut spec.template, at);

        api.replace(name, &PostParams::default(), &stateful_set).await?;
        debug!(namespace, name, "StatefulSet restart requested");
        Ok(())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        self.namespaced::<Pod>(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        debug!(namespace, name, "Pod deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r"
apiVersion: v1
kind: Config
current-context: staging
clusters:
  - name: staging
    cluster:
      server: https://127.0.0.1:6443
contexts:
  - name: dev
    context:
      cluster: staging
      user: developer
  - name: staging
    context:
      cluster: staging
      user: deployer
users:
  - name: deployer
    user:
      token: abc123
";

    fn parse(text: &str) -> Kubeconfig {
        Kubeconfig::from_yaml(text).unwrap()
    }

    #[test]
    fn current_user_follows_current_context() {
        assert_eq!(current_user(&parse(KUBECONFIG)), "deployer");
    }

    #[test]
    fn current_user_is_empty_without_current_context() {
        let without = KUBECONFIG.replace("current-context: staging\n", "");
        assert_eq!(current_user(&parse(&without)), "");

        let dangling = KUBECONFIG.replace("current-context: staging", "current-context: missing");
        assert_eq!(current_user(&parse(&dangling)), "");
    }

    #[test]
    fn exec_plugins_are_detected() {
        assert_eq!(credential_plugin_user(&parse(KUBECONFIG)), None);

        let exec = KUBECONFIG.replace(
            "      token: abc123\n",
            "      exec:\n        apiVersion: client.authentication.k8s.io/v1beta1\n        command: aws\n        args: [eks, get-token]\n",
        );
        assert_eq!(credential_plugin_user(&parse(&exec)), Some("deployer"));

        let provider = KUBECONFIG.replace(
            "      token: abc123\n",
            "      auth-provider:\n        name: oidc\n        config: {}\n",
        );
        assert_eq!(credential_plugin_user(&parse(&provider)), Some("deployer"));
    }

    #[tokio::test]
    async fn malformed_upload_is_invalid_credential() {
        let error = KubeconfigValidator::new()
            .validate(&Credential::from("clusters: [unterminated"))
            .await
            .unwrap_err();

        assert!(matches!(error, CredentialError::InvalidCredential(_)), "{error:?}");
    }

    #[tokio::test]
    async fn non_utf8_upload_is_invalid_credential() {
        let error = KubeconfigValidator::new()
            .validate(&Credential::from(vec![0xff, 0xfe, 0x00]))
            .await
            .unwrap_err();

        assert!(matches!(error, CredentialError::InvalidCredential(_)), "{error:?}");
    }

    #[tokio::test]
    async fn unresolvable_context_is_connection_config_error() {
        let dangling = KUBECONFIG.replace("current-context: staging", "current-context: missing");
        let error = KubeconfigValidator::new()
            .validate(&Credential::from(dangling.as_str()))
            .await
            .unwrap_err();

        assert!(matches!(error, CredentialError::ConnectionConfig(_)), "{error:?}");
    }
}
