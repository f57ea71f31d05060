//! Rollout status resolution.
//!
//! # Replica workloads
//!
//! Deployments and StatefulSets are resolved by evaluating every rule below in
//! order. A later rule that matches **overwrites** whatever an earlier rule
//! produced; this is not a first-match chain.
//!
//! | # | Condition | Result |
//! |---|-----------|--------|
//! | 1 | always | `{ready}/{desired}` |
//! | 2 | progressing and (updated < desired or available < desired or unavailable > 0) | `{available}/{desired} (Updating...)` |
//! | 3 | not progressing and unavailable > 0 | `{available}/{desired} (Unavailable...)` |
//! | 4 | replica failure | `{available}/{desired} (Failed)` |
//! | 5 | ready < desired | `{ready}/{desired} (Not Ready)` |
//!
//! Rule 5 runs last, so a lagging ready count hides "Updating", "Unavailable"
//! and "Failed". Dashboards depend on exactly this output, keep the order.
//!
//! # Pods
//!
//! See [`resolve_pod`].

use crate::workload::{PodSummary, ReplicaStatus};

/// Display status for a Deployment or StatefulSet.
///
/// # Examples
///
/// ```
/// use kubeboard_core::{ReplicaStatus, status::resolve_replicas};
///
/// let mid_rollout = ReplicaStatus {
///     desired: 3,
///     ready: 1,
///     available: 2,
///     updated: 2,
///     progressing: true,
///     ..ReplicaStatus::default()
/// };
/// assert_eq!(resolve_replicas(&mid_rollout), "1/3 (Not Ready)");
/// ```
#[must_use]
pub fn resolve_replicas(status: &ReplicaStatus) -> String {
    let desired = status.desired;

    let mut message = format!("{}/{desired}", status.ready);

    if status.progressing
        && (status.updated < desired || status.available < desired || status.unavailable > 0)
    {
        message = format!("{}/{desired} (Updating...)", status.available);
    }

    if !status.progressing && status.unavailable > 0 {
        message = format!("{}/{desired} (Unavailable...)", status.available);
    }

    if status.replica_failure {
        message = format!("{}/{desired} (Failed)", status.available);
    }

    if status.ready < desired {
        message = format!("{}/{desired} (Not Ready)", status.ready);
    }

    message
}

/// Display fields derived from a Pod's container statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodStatusLine {
    /// `{ready containers}/{declared containers}`.
    pub ready: String,
    /// Combined not-ready reasons, or the pod phase when there are none.
    pub status: String,
    /// Sum of container restart counters.
    pub restarts: i32,
}

/// Resolve the ready count, status and restart total of a Pod.
///
/// Iteration is bounded by the number of containers declared in the spec. A
/// declared container without a reported status counts as not ready with no
/// restarts and no reason.
///
/// For each not-ready container its waiting reason and then its terminated
/// reason are collected; non-empty reasons are joined with single spaces.
/// When no reason was collected the pod phase is shown instead.
#[must_use]
pub fn resolve_pod(pod: &PodSummary) -> PodStatusLine {
    let mut ready = 0usize;
    let mut restarts = 0i32;
    let mut reasons: Vec<&str> = Vec::new();

    for index in 0..pod.declared_containers {
        let Some(container) = pod.containers.get(index) else {
            continue;
        };

        restarts = restarts.saturating_add(container.restarts);

        if container.ready {
            ready += 1;
            continue;
        }

        reasons.extend(
            [&container.waiting_reason, &container.terminated_reason]
                .into_iter()
                .flatten()
                .map(|reason| reason.trim())
                .filter(|reason| !reason.is_empty()),
        );
    }

    let status = if reasons.is_empty() {
        pod.phase.to_string()
    } else {
        reasons.join(" ")
    };

    PodStatusLine {
        ready: format!("{ready}/{}", pod.declared_containers),
        status,
        restarts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{ContainerSummary, PodPhase};
    use proptest::prelude::*;

    fn replicas(desired: i32, ready: i32, available: i32, updated: i32) -> ReplicaStatus {
        ReplicaStatus {
            desired,
            ready,
            available,
            updated,
            unavailable: 0,
            progressing: false,
            replica_failure: false,
        }
    }

    fn container(ready: bool, restarts: i32, waiting: Option<&str>) -> ContainerSummary {
        ContainerSummary {
            ready,
            restarts,
            waiting_reason: waiting.map(str::to_string),
            terminated_reason: None,
        }
    }

    #[test]
    fn healthy_rollout_keeps_baseline() {
        let status = ReplicaStatus {
            progressing: true,
            ..replicas(3, 3, 3, 3)
        };
        assert_eq!(resolve_replicas(&status), "3/3");
    }

    #[test]
    fn not_ready_overwrites_updating() {
        let status = ReplicaStatus {
            progressing: true,
            ..replicas(3, 1, 2, 2)
        };
        assert_eq!(resolve_replicas(&status), "1/3 (Not Ready)");
    }

    #[test]
    fn failure_shown_when_ready_matches_desired() {
        let status = ReplicaStatus {
            replica_failure: true,
            ..replicas(3, 3, 1, 3)
        };
        assert_eq!(resolve_replicas(&status), "1/3 (Failed)");
    }

    #[test]
    fn updating_survives_when_ready_is_complete() {
        let status = ReplicaStatus {
            progressing: true,
            ..replicas(3, 3, 3, 2)
        };
        assert_eq!(resolve_replicas(&status), "3/3 (Updating...)");
    }

    #[test]
    fn unavailable_only_without_progressing() {
        let stalled = ReplicaStatus {
            unavailable: 1,
            ..replicas(3, 3, 2, 3)
        };
        assert_eq!(resolve_replicas(&stalled), "2/3 (Unavailable...)");

        let rolling = ReplicaStatus {
            progressing: true,
            ..stalled
        };
        assert_eq!(resolve_replicas(&rolling), "2/3 (Updating...)");
    }

    #[test]
    fn failure_overwrites_unavailable() {
        let status = ReplicaStatus {
            unavailable: 2,
            replica_failure: true,
            ..replicas(3, 3, 1, 3)
        };
        assert_eq!(resolve_replicas(&status), "1/3 (Failed)");
    }

    #[test]
    fn scaled_to_zero() {
        assert_eq!(resolve_replicas(&replicas(0, 0, 0, 0)), "0/0");
    }

    #[test]
    fn pod_reports_waiting_reason() {
        let pod = PodSummary {
            declared_containers: 2,
            containers: vec![
                container(true, 0, None),
                container(false, 4, Some("CrashLoopBackOff")),
            ],
            phase: PodPhase::Running,
        };

        let line = resolve_pod(&pod);
        assert_eq!(line.ready, "1/2");
        assert_eq!(line.status, "CrashLoopBackOff");
        assert_eq!(line.restarts, 4);
    }

    #[test]
    fn pod_falls_back_to_phase() {
        let pod = PodSummary {
            declared_containers: 1,
            containers: vec![container(true, 1, None)],
            phase: PodPhase::Running,
        };

        let line = resolve_pod(&pod);
        assert_eq!(line.ready, "1/1");
        assert_eq!(line.status, "Running");
        assert_eq!(line.restarts, 1);
    }

    #[test]
    fn pod_joins_reasons_of_all_not_ready_containers() {
        let mut terminated = container(false, 0, None);
        terminated.terminated_reason = Some("Error".into());

        let mut both = container(false, 2, Some("ContainerCreating"));
        both.terminated_reason = Some("OOMKilled".into());

        let pod = PodSummary {
            declared_containers: 3,
            containers: vec![terminated, container(false, 0, Some("")), both],
            phase: PodPhase::Pending,
        };

        let line = resolve_pod(&pod);
        assert_eq!(line.ready, "0/3");
        assert_eq!(line.status, "Error ContainerCreating OOMKilled");
        assert_eq!(line.restarts, 2);
    }

    #[test]
    fn pod_with_missing_statuses() {
        let pod = PodSummary {
            declared_containers: 2,
            containers: Vec::new(),
            phase: PodPhase::Pending,
        };

        let line = resolve_pod(&pod);
        assert_eq!(line.ready, "0/2");
        assert_eq!(line.status, "Pending");
        assert_eq!(line.restarts, 0);
    }

    #[test]
    fn pod_ignores_statuses_beyond_spec() {
        let pod = PodSummary {
            declared_containers: 1,
            containers: vec![container(true, 0, None), container(false, 9, Some("Bogus"))],
            phase: PodPhase::Running,
        };

        let line = resolve_pod(&pod);
        assert_eq!(line.ready, "1/1");
        assert_eq!(line.status, "Running");
        assert_eq!(line.restarts, 0);
    }

    proptest! {
        #[test]
        fn lagging_ready_count_always_wins(
            desired in 1i32..50,
            lag in 1i32..50,
            available in 0i32..50,
            updated in 0i32..50,
            unavailable in 0i32..50,
            progressing: bool,
            replica_failure: bool,
        ) {
            let ready = (desired - lag).max(0);
            let status = ReplicaStatus {
                desired,
                ready,
                available,
                updated,
                unavailable,
                progressing,
                replica_failure,
            };
            prop_assert_eq!(
                resolve_replicas(&status),
                format!("{ready}/{desired} (Not Ready)")
            );
        }

        #[test]
        fn failure_wins_when_ready(
            desired in 0i32..50,
            available in 0i32..50,
            updated in 0i32..50,
            unavailable in 0i32..50,
            progressing: bool,
        ) {
            let status = ReplicaStatus {
                desired,
                ready: desired,
                available,
                updated,
                unavailable,
                progressing,
                replica_failure: true,
            };
            prop_assert_eq!(
                resolve_replicas(&status),
                format!("{available}/{desired} (Failed)")
            );
        }
    }
}
