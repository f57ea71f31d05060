//! The cluster collaborator seam.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kubeboard_core::WorkloadSnapshot;

/// Operations the dashboard performs against a cluster.
///
/// One instance is bound to one user's credential. List operations return
/// snapshots in the order the API server produced them.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Names of every namespace visible to the credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the API call fails.
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// Deployments in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the API call fails.
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>>;

    /// StatefulSets in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the API call fails.
    async fn list_stateful_sets(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>>;

    /// Pods in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the API call fails.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>>;

    /// Trigger a rolling restart of a Deployment by stamping its pod
    /// template with the restart time `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the read or
    /// the write-back fails, including when the Deployment does not exist.
    async fn restart_deployment(&self, namespace: &str, name: &str, at: DateTime<Utc>)
    -> Result<()>;

    /// Trigger a rolling restart of a StatefulSet.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the read or
    /// the write-back fails.
    async fn restart_stateful_set(
        &self,
        namespace: &str,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete a pod so its controller recreates it.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Api`](crate::ClusterError::Api) if the delete fails.
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()>;
}
