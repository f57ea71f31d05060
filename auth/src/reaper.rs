//! Background sweep of expired sessions.
//!
//! Expired sessions are already invisible to lookups; the reaper only keeps
//! the store from growing without bound. It runs as a single tokio task and
//! stops when its [`ReaperHandle`] is shut down or dropped.

use crate::providers::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Spawns the periodic reaper task.
pub struct SessionReaper;

impl SessionReaper {
    /// Start sweeping `store` every `interval`.
    ///
    /// The first sweep happens one full interval after spawning. Must be
    /// called from within a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn SessionStore>, interval: Duration) -> ReaperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(interval_secs = interval.as_secs(), "Session reaper started");

            loop {
                tokio::select! {
                    biased;

                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let removed = store.reap();
                        debug!(removed, remaining = store.len(), "Session sweep complete");
                    }
                }
            }

            info!("Session reaper stopped");
        });

        ReaperHandle { stop_tx, task }
    }
}

/// Handle to a running reaper.
///
/// Dropping the handle also stops the task, without waiting for it.
#[derive(Debug)]
pub struct ReaperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signal the reaper to stop and wait for it to finish.
    ///
    /// A sweep already in progress completes first.
    pub async fn shutdown(self) {
        // Send only fails when the task already exited.
        let _ = self.stop_tx.send(true);

        if let Err(error) = self.task.await {
            warn!(%error, "Session reaper terminated abnormally");
        }
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::stores::InMemorySessionStore;
    use kubeboard_core::Credential;
    use kubeboard_testing::test_clock;

    const INTERVAL: Duration = Duration::from_secs(300);

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweeps_expired_sessions_on_each_tick() {
        let clock = test_clock();
        let store = Arc::new(InMemorySessionStore::new(
            &SessionConfig::default(),
            Arc::new(clock.clone()),
        ));
        store.create(Credential::from("kind: Config"), "admin".into(), None);

        let reaper = SessionReaper::spawn(store.clone(), INTERVAL);

        clock.advance(chrono::Duration::hours(2));
        tokio::time::sleep(INTERVAL / 2).await;
        settle().await;
        assert_eq!(store.len(), 1, "no sweep before the first interval elapses");

        tokio::time::sleep(INTERVAL).await;
        settle().await;
        assert!(store.is_empty());

        reaper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn live_sessions_survive_a_sweep() {
        let clock = test_clock();
        let store = Arc::new(InMemorySessionStore::new(
            &SessionConfig::default(),
            Arc::new(clock.clone()),
        ));
        let token = store.create(Credential::from("kind: Config"), "admin".into(), None);

        let reaper = SessionReaper::spawn(store.clone(), INTERVAL);
        tokio::time::sleep(INTERVAL * 2).await;
        settle().await;

        assert!(store.lookup(&token).is_some());
        reaper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_task() {
        let clock = test_clock();
        let store = Arc::new(InMemorySessionStore::new(
            &SessionConfig::default(),
            Arc::new(clock.clone()),
        ));

        let reaper = SessionReaper::spawn(store, INTERVAL);
        assert!(!reaper.is_finished());

        tokio::time::timeout(Duration::from_secs(1), reaper.shutdown())
            .await
            .expect("reaper should stop promptly");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let clock = test_clock();
        let store = Arc::new(InMemorySessionStore::new(
            &SessionConfig::default(),
            Arc::new(clock.clone()),
        ));
        store.create(Credential::from("kind: Config"), "admin".into(), None);

        drop(SessionReaper::spawn(store.clone(), INTERVAL));
        settle().await;

        clock.advance(chrono::Duration::hours(2));
        tokio::time::sleep(INTERVAL * 2).await;
        settle().await;

        assert_eq!(store.len(), 1, "a stopped reaper must not sweep");
    }
}
