//! Recording fakes for the cluster seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kubeboard_cluster::{
    ClusterClient, ClusterError, CredentialError, CredentialValidator, ValidatedCredential,
};
use kubeboard_core::{Credential, WorkloadSnapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by a [`FakeCluster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    /// `list_namespaces`
    ListNamespaces,
    /// `list_deployments`
    ListDeployments {
        /// Requested namespace.
        namespace: String,
    },
    /// `list_stateful_sets`
    ListStatefulSets {
        /// Requested namespace.
        namespace: String,
    },
    /// `list_pods`
    ListPods {
        /// Requested namespace.
        namespace: String,
    },
    /// `restart_deployment`
    RestartDeployment {
        /// Namespace of the Deployment.
        namespace: String,
        /// Deployment name.
        name: String,
        /// Restart time stamped on the template.
        at: DateTime<Utc>,
    },
    /// `restart_stateful_set`
    RestartStatefulSet {
        /// Namespace of the StatefulSet.
        namespace: String,
        /// StatefulSet name.
        name: String,
        /// Restart time stamped on the template.
        at: DateTime<Utc>,
    },
    /// `delete_pod`
    DeletePod {
        /// Namespace of the pod.
        namespace: String,
        /// Pod name.
        name: String,
    },
}

#[derive(Debug, Default)]
struct State {
    namespaces: Vec<String>,
    deployments: Vec<WorkloadSnapshot>,
    stateful_sets: Vec<WorkloadSnapshot>,
    pods: Vec<WorkloadSnapshot>,
    failure: Option<ClusterError>,
    delay: Option<Duration>,
    calls: Vec<ClusterCall>,
}

/// In-memory [`ClusterClient`] serving canned snapshots.
///
/// Lists are filtered by namespace and keep insertion order. Every call is
/// recorded, including failing ones. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    /// Create an empty cluster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace list.
    #[must_use]
    pub fn with_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Deployments served by `list_deployments`.
    #[must_use]
    pub fn with_deployments(self, deployments: Vec<WorkloadSnapshot>) -> Self {
        self.state().deployments = deployments;
        self
    }

    /// Set the StatefulSets served by `list_stateful_sets`.
    #[must_use]
    pub fn with_stateful_sets(self, stateful_sets: Vec<WorkloadSnapshot>) -> Self {
        self.state().stateful_sets = stateful_sets;
        self
    }

    /// Set the Pods served by `list_pods`.
    #[must_use]
    pub fn with_pods(self, pods: Vec<WorkloadSnapshot>) -> Self {
        self.state().pods = pods;
        self
    }

    /// Make every call fail with `error`.
    #[must_use]
    pub fn failing_with(self, error: ClusterError) -> Self {
        self.state().failure = Some(error);
        self
    }

    /// Make every call sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state().delay = Some(delay);
        self
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ClusterCall> {
        self.state().calls.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call`, wait out any configured delay, then apply the failure
    /// mode.
    async fn answer(&self, call: ClusterCall) -> Result<(), ClusterError> {
        let (delay, failure) = {
            let mut state = self.state();
            state.calls.push(call);
            (state.delay, state.failure.clone())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map_or(Ok(()), Err)
    }

    fn in_namespace(snapshots: &[WorkloadSnapshot], namespace: &str) -> Vec<WorkloadSnapshot> {
        snapshots
            .iter()
            .filter(|snapshot| snapshot.namespace == namespace)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        self.answer(ClusterCall::ListNamespaces).await?;
        Ok(self.state().namespaces.clone())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>, ClusterError> {
        self.answer(ClusterCall::ListDeployments {
            namespace: namespace.to_owned(),
        })
        .await?;
        Ok(Self::in_namespace(&self.state().deployments, namespace))
    }

    async fn list_stateful_sets(
        &self,
        namespace: &str,
    ) -> Result<Vec<WorkloadSnapshot>, ClusterError> {
        self.answer(ClusterCall::ListStatefulSets {
            namespace: namespace.to_owned(),
        })
        .await?;
        Ok(Self::in_namespace(&self.state().stateful_sets, namespace))
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<WorkloadSnapshot>, ClusterError> {
        self.answer(ClusterCall::ListPods {
            namespace: namespace.to_owned(),
        })
        .await?;
        Ok(Self::in_namespace(&self.state().pods, namespace))
    }

    async fn restart_deployment(
        &self,
        namespace: &str,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ClusterError> {
        self.answer(ClusterCall::RestartDeployment {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            at,
        })
        .await
    }

    async fn restart_stateful_set(
        &self,
        namespace: &str,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ClusterError> {
        self.answer(ClusterCall::RestartStatefulSet {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            at,
        })
        .await
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.answer(ClusterCall::DeletePod {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
        .await
    }
}

/// [`CredentialValidator`] handing out a shared [`FakeCluster`].
///
/// Credentials whose content is exactly [`FakeValidator::INVALID`] are
/// rejected as unparseable, so one validator can serve both paths in a test.
#[derive(Debug, Clone)]
pub struct FakeValidator {
    cluster: FakeCluster,
    username: String,
    failure: Option<CredentialError>,
    validations: Arc<AtomicUsize>,
}

impl FakeValidator {
    /// Credential content rejected with [`CredentialError::InvalidCredential`].
    pub const INVALID: &'static str = "not a kubeconfig";

    /// Accept credentials, binding them to `cluster` and `username`.
    #[must_use]
    pub fn accepting(cluster: FakeCluster, username: impl Into<String>) -> Self {
        Self {
            cluster,
            username: username.into(),
            failure: None,
            validations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reject every credential with `error`.
    #[must_use]
    pub fn rejecting(error: CredentialError) -> Self {
        Self {
            failure: Some(error),
            ..Self::accepting(FakeCluster::new(), "")
        }
    }

    /// Number of `validate` calls so far.
    #[must_use]
    pub fn validations(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialValidator for FakeValidator {
    async fn validate(&self, credential: &Credential) -> Result<ValidatedCredential, CredentialError> {
        self.validations.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if credential.as_bytes() == Self::INVALID.as_bytes() {
            return Err(CredentialError::InvalidCredential(
                "error converting YAML to JSON".into(),
            ));
        }

        Ok(ValidatedCredential {
            client: Arc::new(self.cluster.clone()),
            username: self.username.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::test_time;

    #[tokio::test]
    async fn lists_filter_by_namespace_and_record_calls() {
        let cluster = FakeCluster::new().with_pods(vec![
            fixtures::running_pod("a", "prod", test_time()),
            fixtures::running_pod("b", "dev", test_time()),
        ]);

        let pods = cluster.list_pods("prod").await.unwrap();
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].name, "a");
        assert_eq!(
            cluster.calls(),
            vec![ClusterCall::ListPods {
                namespace: "prod".into()
            }]
        );
    }

    #[tokio::test]
    async fn failure_mode_still_records() {
        let cluster = FakeCluster::new().failing_with(ClusterError::Api("forbidden".into()));

        let error = cluster.delete_pod("prod", "a").await.unwrap_err();
        assert_eq!(error, ClusterError::Api("forbidden".into()));
        assert_eq!(cluster.call_count(), 1);
    }

    #[tokio::test]
    async fn validator_shares_its_cluster() {
        let cluster = FakeCluster::new().with_namespaces(["default"]);
        let validator = FakeValidator::accepting(cluster.clone(), "admin");

        let validated = validator.validate(&Credential::from("kind: Config")).await.unwrap();
        assert_eq!(validated.username, "admin");
        assert_eq!(validated.client.list_namespaces().await.unwrap(), vec!["default"]);
        assert_eq!(cluster.calls(), vec![ClusterCall::ListNamespaces]);

        let rejected = validator.validate(&Credential::from(FakeValidator::INVALID)).await;
        assert!(matches!(rejected, Err(CredentialError::InvalidCredential(_))));
        assert_eq!(validator.validations(), 2);
    }
}
