//! # Kubeboard Testing
//!
//! Testing utilities and fakes for Kubeboard.
//!
//! This crate provides:
//! - A manually driven [`Clock`] for expiry and age tests
//! - In-memory fakes for the cluster seams that record every call
//! - Snapshot fixtures and proptest strategies for domain types
//!
//! ## Example
//!
//! ```ignore
//! use kubeboard_testing::{FakeCluster, FakeValidator, fixtures, test_clock};
//!
//! let cluster = FakeCluster::new()
//!     .with_namespaces(["default", "prod"])
//!     .with_deployments(vec![fixtures::deployment("web", "prod", status, created)]);
//! let validator = FakeValidator::accepting(cluster.clone(), "admin");
//!
//! // ... drive the router, then
//! assert_eq!(cluster.calls(), vec![ClusterCall::ListNamespaces]);
//! ```

use chrono::{DateTime, Duration, Utc};
use kubeboard_core::environment::Clock;

pub mod cluster;
pub mod fixtures;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the code under test.
    ///
    /// # Example
    ///
    /// ```
    /// use kubeboard_testing::mocks::ManualClock;
    /// use kubeboard_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = ManualClock::new(Utc::now());
    /// let start = clock.now();
    /// clock.advance(Duration::minutes(5));
    /// assert_eq!(clock.now() - start, Duration::minutes(5));
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock by `delta`, which may be negative.
        pub fn advance(&self, delta: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += delta;
        }

        /// Jump to `time`.
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Instant every test clock starts at (2025-01-01 00:00:00 UTC).
    #[must_use]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a manual clock for tests, stopped at [`test_time`].
    #[must_use]
    pub fn test_clock() -> ManualClock {
        ManualClock::new(test_time())
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use kubeboard_core::ReplicaStatus;
    use proptest::prelude::*;

    /// Arbitrary replica counters in a realistic range.
    pub fn replica_status() -> impl Strategy<Value = ReplicaStatus> {
        (
            0..10i32,
            0..10i32,
            0..10i32,
            0..10i32,
            0..10i32,
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(desired, ready, available, updated, unavailable, progressing, replica_failure)| {
                    ReplicaStatus {
                        desired,
                        ready,
                        available,
                        updated,
                        unavailable,
                        progressing,
                        replica_failure,
                    }
                },
            )
    }
}

/// Install a `fmt` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use cluster::{ClusterCall, FakeCluster, FakeValidator};
pub use mocks::{ManualClock, test_clock, test_time};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = test_clock();
        let handle = clock.clone();

        handle.advance(Duration::hours(2));
        assert_eq!(clock.now(), test_time() + Duration::hours(2));

        clock.set(test_time());
        assert_eq!(handle.now(), test_time());
    }

    #[test]
    fn test_time_is_new_year_2025() {
        assert_eq!(test_time().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
