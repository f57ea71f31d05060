//! Snapshot fixtures.

use chrono::{DateTime, Utc};
use kubeboard_core::{
    ContainerSummary, PodPhase, PodSummary, ReplicaStatus, WorkloadKind, WorkloadSnapshot,
};
use std::collections::BTreeMap;

/// A minimal kubeconfig, for tests that need realistic upload content.
pub const KUBECONFIG: &str = "\
apiVersion: v1
kind: Config
current-context: test
clusters:
  - name: test
    cluster:
      server: https://127.0.0.1:6443
contexts:
  - name: test
    context:
      cluster: test
      user: admin
users:
  - name: admin
    user:
      token: test-token
";

/// Replica counters for a fully rolled out workload of `replicas`.
#[must_use]
pub const fn healthy(replicas: i32) -> ReplicaStatus {
    ReplicaStatus {
        desired: replicas,
        ready: replicas,
        available: replicas,
        updated: replicas,
        unavailable: 0,
        progressing: true,
        replica_failure: false,
    }
}

/// A Deployment snapshot labelled `app=<name>`.
#[must_use]
pub fn deployment(
    name: &str,
    namespace: &str,
    replicas: ReplicaStatus,
    created_at: DateTime<Utc>,
) -> WorkloadSnapshot {
    snapshot(name, namespace, created_at, WorkloadKind::Deployment(replicas))
}

/// A StatefulSet snapshot labelled `app=<name>`.
#[must_use]
pub fn stateful_set(
    name: &str,
    namespace: &str,
    replicas: ReplicaStatus,
    created_at: DateTime<Utc>,
) -> WorkloadSnapshot {
    snapshot(name, namespace, created_at, WorkloadKind::StatefulSet(replicas))
}

/// A Pod snapshot whose declared containers match `containers`.
#[must_use]
pub fn pod(
    name: &str,
    namespace: &str,
    containers: Vec<ContainerSummary>,
    phase: PodPhase,
    created_at: DateTime<Utc>,
) -> WorkloadSnapshot {
    let summary = PodSummary {
        declared_containers: containers.len(),
        containers,
        phase,
    };
    snapshot(name, namespace, created_at, WorkloadKind::Pod(summary))
}

/// A running pod with one ready container.
#[must_use]
pub fn running_pod(name: &str, namespace: &str, created_at: DateTime<Utc>) -> WorkloadSnapshot {
    pod(name, namespace, vec![ready_container()], PodPhase::Running, created_at)
}

/// A ready container that never restarted.
#[must_use]
pub const fn ready_container() -> ContainerSummary {
    ContainerSummary {
        ready: true,
        restarts: 0,
        waiting_reason: None,
        terminated_reason: None,
    }
}

/// A not-ready container stuck waiting for `reason`.
#[must_use]
pub fn waiting_container(reason: &str, restarts: i32) -> ContainerSummary {
    ContainerSummary {
        ready: false,
        restarts,
        waiting_reason: Some(reason.to_owned()),
        terminated_reason: None,
    }
}

fn snapshot(
    name: &str,
    namespace: &str,
    created_at: DateTime<Utc>,
    kind: WorkloadKind,
) -> WorkloadSnapshot {
    WorkloadSnapshot {
        name: name.to_owned(),
        namespace: namespace.to_owned(),
        labels: BTreeMap::from([("app".to_owned(), name.to_owned())]),
        created_at: Some(created_at),
        kind,
    }
}
