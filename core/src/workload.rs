//! Workload snapshots.
//!
//! A [`WorkloadSnapshot`] is a read-only, cluster-agnostic view of a single
//! Deployment, StatefulSet or Pod as it looked when the request fetched it.
//! Snapshots are built per request and never cached.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Point-in-time read of a cluster workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSnapshot {
    /// Object name.
    pub name: String,
    /// Namespace the object lives in.
    pub namespace: String,
    /// Object labels.
    pub labels: BTreeMap<String, String>,
    /// Creation timestamp, when the cluster reported one.
    pub created_at: Option<DateTime<Utc>>,
    /// Variant-specific status.
    pub kind: WorkloadKind,
}

impl WorkloadSnapshot {
    /// Time elapsed between creation and `now`.
    ///
    /// Returns `None` when the creation timestamp is unknown.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.created_at.map(|created| now - created)
    }

    /// Resource type tag used in API responses.
    #[must_use]
    pub const fn resource_type(&self) -> &'static str {
        self.kind.resource_type()
    }
}

/// Variant-specific part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadKind {
    /// A Deployment and its replica counters.
    Deployment(ReplicaStatus),
    /// A StatefulSet and its replica counters.
    StatefulSet(ReplicaStatus),
    /// A Pod and its per-container status.
    Pod(PodSummary),
}

impl WorkloadKind {
    /// Resource type tag used in API responses.
    #[must_use]
    pub const fn resource_type(&self) -> &'static str {
        match self {
            Self::Deployment(_) => "Deployment",
            Self::StatefulSet(_) => "StatefulSet",
            Self::Pod(_) => "Pod",
        }
    }
}

/// Replica counters and rollout conditions shared by Deployments and
/// StatefulSets.
///
/// For StatefulSets `unavailable` is not reported by the cluster; the
/// conversion layer derives it as `desired - available`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicaStatus {
    /// Replicas requested by the spec.
    pub desired: i32,
    /// Replicas passing readiness.
    pub ready: i32,
    /// Replicas available for at least `minReadySeconds`.
    pub available: i32,
    /// Replicas running the latest template.
    pub updated: i32,
    /// Replicas missing or failing.
    pub unavailable: i32,
    /// `Progressing` condition is `True`.
    pub progressing: bool,
    /// `ReplicaFailure` condition is `True`.
    pub replica_failure: bool,
}

/// Pod lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PodPhase {
    /// Accepted but not all containers are running.
    Pending,
    /// Bound to a node with at least one container running.
    Running,
    /// All containers terminated successfully.
    Succeeded,
    /// All containers terminated, at least one in failure.
    Failed,
    /// Phase could not be obtained.
    #[default]
    Unknown,
}

impl PodPhase {
    /// Parse the phase string reported by the cluster.
    ///
    /// Anything unrecognised maps to [`PodPhase::Unknown`].
    #[must_use]
    pub fn from_phase(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Phase name as the cluster spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one container slot in a Pod.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Container passes its readiness probe.
    pub ready: bool,
    /// Restart counter.
    pub restarts: i32,
    /// Reason from the `waiting` state, if any.
    pub waiting_reason: Option<String>,
    /// Reason from the `terminated` state, if any.
    pub terminated_reason: Option<String>,
}

/// Per-container status for a Pod.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodSummary {
    /// Number of containers declared in the pod spec.
    pub declared_containers: usize,
    /// Container statuses in the order the cluster reported them.
    ///
    /// May be shorter than `declared_containers` (e.g. a pod that has not been
    /// scheduled yet).
    pub containers: Vec<ContainerSummary>,
    /// Overall pod phase.
    pub phase: PodPhase,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn phase_parsing() {
        assert_eq!(PodPhase::from_phase(Some("Running")), PodPhase::Running);
        assert_eq!(PodPhase::from_phase(Some("Succeeded")), PodPhase::Succeeded);
        assert_eq!(PodPhase::from_phase(Some("Evicted")), PodPhase::Unknown);
        assert_eq!(PodPhase::from_phase(None), PodPhase::Unknown);
        assert_eq!(PodPhase::Pending.to_string(), "Pending");
    }

    #[test]
    fn age_requires_creation_timestamp() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut snapshot = WorkloadSnapshot {
            name: "web".into(),
            namespace: "default".into(),
            labels: BTreeMap::new(),
            created_at: Some(created),
            kind: WorkloadKind::Pod(PodSummary::default()),
        };

        let now = created + Duration::minutes(5);
        assert_eq!(snapshot.age(now), Some(Duration::minutes(5)));
        assert_eq!(snapshot.resource_type(), "Pod");

        snapshot.created_at = None;
        assert_eq!(snapshot.age(now), None);
    }
}
