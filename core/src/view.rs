//! Resource views returned by the HTTP API.
//!
//! Field names are part of the dashboard's JSON contract (note the mixed
//! `up_to_date` / `resourceType` casing).

use crate::age::format_optional_age;
use crate::status::{resolve_pod, resolve_replicas};
use crate::workload::{WorkloadKind, WorkloadSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Deployment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentView {
    /// Deployment name.
    pub name: String,
    /// Namespace.
    pub namespace: String,
    /// Resolved rollout status.
    pub ready: String,
    /// Replicas running the latest template.
    pub up_to_date: String,
    /// Short age (`3d`, `5h`, ...).
    pub age: String,
    /// Object labels.
    pub labels: BTreeMap<String, String>,
    /// Always `Deployment`.
    #[serde(rename = "resourceType")]
    pub resource_type: &'static str,
}

/// StatefulSet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatefulSetView {
    /// StatefulSet name.
    pub name: String,
    /// Namespace.
    pub namespace: String,
    /// Resolved rollout status.
    pub ready: String,
    /// Short age.
    pub age: String,
    /// Object labels.
    pub labels: BTreeMap<String, String>,
    /// Always `StatefulSet`.
    #[serde(rename = "resourceType")]
    pub resource_type: &'static str,
}

/// Pod row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodView {
    /// Pod name.
    pub name: String,
    /// Namespace.
    pub namespace: String,
    /// `{ready}/{declared}` containers.
    pub ready: String,
    /// Not-ready reasons or pod phase.
    pub status: String,
    /// Total container restarts.
    pub restarts: i32,
    /// Short age.
    pub age: String,
    /// Object labels.
    pub labels: BTreeMap<String, String>,
    /// Always `Pod`.
    #[serde(rename = "resourceType")]
    pub resource_type: &'static str,
}

impl DeploymentView {
    /// Build the row for a Deployment snapshot.
    ///
    /// Returns `None` when the snapshot is not a Deployment.
    #[must_use]
    pub fn from_snapshot(snapshot: WorkloadSnapshot, now: DateTime<Utc>) -> Option<Self> {
        let WorkloadKind::Deployment(replicas) = &snapshot.kind else {
            return None;
        };

        Some(Self {
            ready: resolve_replicas(replicas),
            up_to_date: replicas.updated.to_string(),
            age: format_optional_age(snapshot.age(now)),
            resource_type: snapshot.resource_type(),
            name: snapshot.name,
            namespace: snapshot.namespace,
            labels: snapshot.labels,
        })
    }
}

impl StatefulSetView {
    /// Build the row for a StatefulSet snapshot.
    ///
    /// Returns `None` when the snapshot is not a StatefulSet.
    #[must_use]
    pub fn from_snapshot(snapshot: WorkloadSnapshot, now: DateTime<Utc>) -> Option<Self> {
        let WorkloadKind::StatefulSet(replicas) = &snapshot.kind else {
            return None;
        };

        Some(Self {
            ready: resolve_replicas(replicas),
            age: format_optional_age(snapshot.age(now)),
            resource_type: snapshot.resource_type(),
            name: snapshot.name,
            namespace: snapshot.namespace,
            labels: snapshot.labels,
        })
    }
}

impl PodView {
    /// Build the row for a Pod snapshot.
    ///
    /// Returns `None` when the snapshot is not a Pod.
    #[must_use]
    pub fn from_snapshot(snapshot: WorkloadSnapshot, now: DateTime<Utc>) -> Option<Self> {
        let WorkloadKind::Pod(pod) = &snapshot.kind else {
            return None;
        };
        let line = resolve_pod(pod);

        Some(Self {
            ready: line.ready,
            status: line.status,
            restarts: line.restarts,
            age: format_optional_age(snapshot.age(now)),
            resource_type: snapshot.resource_type(),
            name: snapshot.name,
            namespace: snapshot.namespace,
            labels: snapshot.labels,
        })
    }
}
