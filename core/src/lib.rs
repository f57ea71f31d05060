//! # Kubeboard Core
//!
//! Pure domain types for the Kubeboard rollout dashboard.
//!
//! This crate has no I/O. It turns point-in-time workload snapshots into the
//! display strings the dashboard renders:
//!
//! ```text
//! ┌──────────────────────┐     ┌────────────────┐     ┌──────────────────┐
//! │  WorkloadSnapshot    │ ──▶ │ StatusResolver │ ──▶ │  Resource views  │
//! │  (cluster-agnostic)  │     │  + age format  │     │  (JSON-ready)    │
//! └──────────────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`workload`]: snapshot model for Deployments, StatefulSets and Pods
//! - [`status`]: rollout status resolution
//! - [`age`]: single-unit age formatting
//! - [`view`]: serialisable resource views returned by the HTTP API
//! - [`credential`]: opaque uploaded cluster credential
//! - [`environment`]: injected dependencies (the clock)

pub mod age;
pub mod credential;
pub mod status;
pub mod view;
pub mod workload;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use credential::Credential;
pub use view::{DeploymentView, PodView, StatefulSetView};
pub use workload::{
    ContainerSummary, PodPhase, PodSummary, ReplicaStatus, WorkloadKind, WorkloadSnapshot,
};

/// Environment module - injected dependencies
///
/// All time-dependent logic receives a [`Clock`](environment::Clock) instead of
/// calling `Utc::now()` directly, so session expiry and age rendering can be
/// tested deterministically.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use kubeboard_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
