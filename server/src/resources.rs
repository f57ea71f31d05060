//! Resource aggregation.
//!
//! Every operation resolves the session's credential into a fresh cluster
//! client, performs a single cluster call under the configured timeout, and
//! maps the snapshots it gets back into resource views. Client handles are
//! never cached, so a logged-out or replaced credential cannot be used again.

use kubeboard_auth::Session;
use kubeboard_cluster::{ClusterClient, ClusterError, CredentialError, CredentialValidator};
use kubeboard_core::environment::Clock;
use kubeboard_core::{Credential, DeploymentView, PodView, StatefulSetView, WorkloadSnapshot};
use kubeboard_web::AppError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a resource operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// An uploaded kubeconfig was rejected.
    #[error("Invalid kubeconfig: {0}")]
    InvalidUpload(#[source] CredentialError),

    /// An uploaded kubeconfig validated but the cluster could not be queried.
    #[error("Failed to interact with cluster: {0}")]
    Unreachable(#[source] ClusterError),

    /// A session's stored kubeconfig no longer validates.
    #[error("Failed to validate kubeconfig: {0}")]
    Credential(#[source] CredentialError),

    /// A cluster call failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl From<ResourceError> for AppError {
    fn from(error: ResourceError) -> Self {
        let message = error.to_string();
        match error {
            ResourceError::InvalidUpload(_) => Self::bad_request(message),
            _ => Self::internal(message).with_source(error),
        }
    }
}

/// Outcome of a successful kubeconfig upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// User of the kubeconfig's current context.
    pub username: String,
    /// Namespaces visible to that user.
    pub namespaces: Vec<String>,
}

/// Orchestrates credential validation, cluster calls and status resolution.
pub struct ResourceAggregator {
    validator: Arc<dyn CredentialValidator>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl ResourceAggregator {
    /// Create an aggregator.
    #[must_use]
    pub fn new(
        validator: Arc<dyn CredentialValidator>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            validator,
            clock,
            timeout,
        }
    }

    /// Validate an uploaded kubeconfig and prove it works by listing
    /// namespaces.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidUpload`] when validation fails
    /// - [`ResourceError::Unreachable`] when the namespace listing fails
    pub async fn connect(&self, credential: &Credential) -> Result<Connection, ResourceError> {
        let validated = self
            .validator
            .validate(credential)
            .await
            .map_err(ResourceError::InvalidUpload)?;

        let namespaces = self
            .call(validated.client.list_namespaces())
            .await
            .map_err(ResourceError::Unreachable)?;

        Ok(Connection {
            username: validated.username,
            namespaces,
        })
    }

    /// Namespaces visible to the session's credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn namespaces(&self, session: &Session) -> Result<Vec<String>, ResourceError> {
        let client = self.client_for(session).await?;
        Ok(self.call(client.list_namespaces()).await?)
    }

    /// Deployment rows for `namespace`, in cluster order.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn deployments(
        &self,
        session: &Session,
        namespace: &str,
    ) -> Result<Vec<DeploymentView>, ResourceError> {
        let client = self.client_for(session).await?;
        let snapshots = self.call(client.list_deployments(namespace)).await?;
        Ok(self.views(snapshots, DeploymentView::from_snapshot))
    }

    /// StatefulSet rows for `namespace`, in cluster order.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn stateful_sets(
        &self,
        session: &Session,
        namespace: &str,
    ) -> Result<Vec<StatefulSetView>, ResourceError> {
        let client = self.client_for(session).await?;
        let snapshots = self.call(client.list_stateful_sets(namespace)).await?;
        Ok(self.views(snapshots, StatefulSetView::from_snapshot))
    }

    /// Pod rows for `namespace`, in cluster order.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn pods(
        &self,
        session: &Session,
        namespace: &str,
    ) -> Result<Vec<PodView>, ResourceError> {
        let client = self.client_for(session).await?;
        let snapshots = self.call(client.list_pods(namespace)).await?;
        Ok(self.views(snapshots, PodView::from_snapshot))
    }

    /// Restart a Deployment's pods.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails, including when the Deployment does not exist.
    pub async fn restart_deployment(
        &self,
        session: &Session,
        namespace: &str,
        name: &str,
    ) -> Result<(), ResourceError> {
        let client = self.client_for(session).await?;
        let at = self.clock.now();
        self.call(client.restart_deployment(namespace, name, at)).await?;
        debug!(user = %session.username, namespace, name, "Deployment restarted");
        Ok(())
    }

    /// Restart a StatefulSet's pods.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn restart_stateful_set(
        &self,
        session: &Session,
        namespace: &str,
        name: &str,
    ) -> Result<(), ResourceError> {
        let client = self.client_for(session).await?;
        let at = self.clock.now();
        self.call(client.restart_stateful_set(namespace, name, at)).await?;
        debug!(user = %session.username, namespace, name, "StatefulSet restarted");
        Ok(())
    }

    /// Delete a pod so its controller recreates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential no longer validates or the cluster
    /// call fails.
    pub async fn delete_pod(
        &self,
        session: &Session,
        namespace: &str,
        name: &str,
    ) -> Result<(), ResourceError> {
        let client = self.client_for(session).await?;
        self.call(client.delete_pod(namespace, name)).await?;
        debug!(user = %session.username, namespace, name, "Pod deleted");
        Ok(())
    }

    async fn client_for(&self, session: &Session) -> Result<Arc<dyn ClusterClient>, ResourceError> {
        let validated = self
            .validator
            .validate(&session.credential)
            .await
            .map_err(ResourceError::Credential)?;
        Ok(validated.client)
    }

    /// Run one cluster call under the request timeout.
    async fn call<T>(
        &self,
        call: impl Future<Output = Result<T, ClusterError>>,
    ) -> Result<T, ClusterError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(ClusterError::Timeout))
    }

    fn views<V>(
        &self,
        snapshots: Vec<WorkloadSnapshot>,
        view: fn(WorkloadSnapshot, chrono::DateTime<chrono::Utc>) -> Option<V>,
    ) -> Vec<V> {
        let now = self.clock.now();
        snapshots
            .into_iter()
            .filter_map(|snapshot| view(snapshot, now))
            .collect()
    }
}

impl std::fmt::Debug for ResourceAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceAggregator")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
