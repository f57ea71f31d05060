//! Conversion from Kubernetes API objects to workload snapshots.
//!
//! Missing fields are read leniently: absent counters count as zero, absent
//! names as empty strings. The API server always fills these in for objects it
//! returns, so the fallbacks only matter for hand-built fixtures.

use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{ContainerStatus, Pod, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubeboard_core::{
    ContainerSummary, PodPhase, PodSummary, ReplicaStatus, WorkloadKind, WorkloadSnapshot,
};

/// Annotation whose change makes a controller roll its pods.
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

const PROGRESSING: &str = "Progressing";
const REPLICA_FAILURE: &str = "ReplicaFailure";

/// Snapshot of a Deployment.
#[must_use]
pub fn deployment_snapshot(deployment: Deployment) -> WorkloadSnapshot {
    let status = deployment.status.unwrap_or_default();
    let desired = deployment
        .spec
        .and_then(|spec| spec.replicas)
        .or(status.replicas)
        .unwrap_or(0);

    let conditions = status.conditions.unwrap_or_default();
    let conditions = conditions
        .iter()
        .map(|c| (c.type_.as_str(), c.status.as_str()));
    let (progressing, replica_failure) = rollout_conditions(conditions);

    let replicas = ReplicaStatus {
        desired,
        ready: status.ready_replicas.unwrap_or(0),
        available: status.available_replicas.unwrap_or(0),
        updated: status.updated_replicas.unwrap_or(0),
        unavailable: status.unavailable_replicas.unwrap_or(0),
        progressing,
        replica_failure,
    };

    snapshot(deployment.metadata, WorkloadKind::Deployment(replicas))
}

/// Snapshot of a StatefulSet.
///
/// StatefulSets report no unavailable count; it is derived as
/// `desired - available`.
#[must_use]
pub fn stateful_set_snapshot(stateful_set: StatefulSet) -> WorkloadSnapshot {
    let desired = stateful_set
        .spec
        .and_then(|spec| spec.replicas)
        .unwrap_or(0);
    let status = stateful_set.status.unwrap_or_default();
    let available = status.available_replicas.unwrap_or(0);

    let conditions = status.conditions.unwrap_or_default();
    let conditions = conditions
        .iter()
        .map(|c| (c.type_.as_str(), c.status.as_str()));
    let (progressing, replica_failure) = rollout_conditions(conditions);

    let replicas = ReplicaStatus {
        desired,
        ready: status.ready_replicas.unwrap_or(0),
        available,
        updated: status.updated_replicas.unwrap_or(0),
        unavailable: desired.saturating_sub(available),
        progressing,
        replica_failure,
    };

    snapshot(stateful_set.metadata, WorkloadKind::StatefulSet(replicas))
}

/// Snapshot of a Pod.
#[must_use]
pub fn pod_snapshot(pod: Pod) -> WorkloadSnapshot {
    let declared_containers = pod.spec.map_or(0, |spec| spec.containers.len());
    let status = pod.status.unwrap_or_default();

    let summary = PodSummary {
        declared_containers,
        containers: status
            .container_statuses
            .unwrap_or_default()
            .into_iter()
            .map(container_summary)
            .collect(),
        phase: PodPhase::from_phase(status.phase.as_deref()),
    };

    snapshot(pod.metadata, WorkloadKind::Pod(summary))
}

/// Set the restart annotation on a pod template to `at`, overwriting any
/// previous value.
pub fn stamp_restart(template: &mut PodTemplateSpec, at: DateTime<Utc>) {
    template
        .metadata
        .get_or_insert_with(ObjectMeta::default)
        .annotations
        .get_or_insert_with(Default::default)
        .insert(RESTARTED_AT_ANNOTATION.to_owned(), at.to_rfc3339());
}

fn container_summary(status: ContainerStatus) -> ContainerSummary {
    let state = status.state.unwrap_or_default();
    ContainerSummary {
        ready: status.ready,
        restarts: status.restart_count,
        waiting_reason: state.waiting.and_then(|waiting| waiting.reason),
        terminated_reason: state.terminated.and_then(|terminated| terminated.reason),
    }
}

/// `(progressing, replica_failure)` from `(type, status)` condition pairs.
fn rollout_conditions<'a>(conditions: impl Iterator<Item = (&'a str, &'a str)>) -> (bool, bool) {
    conditions.fold((false, false), |(progressing, failure), (kind, status)| {
        let is_true = status == "True";
        (
            progressing || (kind == PROGRESSING && is_true),
            failure || (kind == REPLICA_FAILURE && is_true),
        )
    })
}

fn snapshot(metadata: ObjectMeta, kind: WorkloadKind) -> WorkloadSnapshot {
    WorkloadSnapshot {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        created_at: metadata.creation_timestamp.map(|time| time.0),
        kind,
    }
}
