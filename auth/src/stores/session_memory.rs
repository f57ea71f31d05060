//! In-memory session store.

use crate::config::SessionConfig;
use crate::providers::SessionStore;
use crate::state::{Session, SessionToken};
use chrono::Duration;
use kubeboard_core::Credential;
use kubeboard_core::environment::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local session store.
///
/// The session map and the last issued token live behind a single
/// `RwLock`: lookups share the lock, every mutation takes it exclusively.
/// A poisoned lock is recovered rather than propagated, since no operation
/// leaves the map half-updated.
#[derive(Clone)]
pub struct InMemorySessionStore {
    inner: Arc<RwLock<Inner>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionToken, Session>,
    last_issued: i64,
}

impl InMemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            clock,
            ttl: config.ttl,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    /// Next token: the current nanosecond timestamp, bumped past the last
    /// issued one when the clock has not moved.
    fn issue_token(&mut self, now_nanos: i64) -> SessionToken {
        let nanos = now_nanos.max(self.last_issued.saturating_add(1));
        self.last_issued = nanos;
        SessionToken::from_nanos(nanos)
    }
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("sessions", &self.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(
        &self,
        credential: Credential,
        username: String,
        replaces: Option<&SessionToken>,
    ) -> SessionToken {
        let now = self.clock.now();
        let mut inner = self.write();

        if let Some(previous) = replaces {
            if inner.sessions.remove(previous).is_some() {
                tracing::debug!(token = %previous, "Replaced previous session");
            }
        }

        let token = inner.issue_token(now.timestamp_nanos_opt().unwrap_or_default());
        let session = Session {
            token: token.clone(),
            credential,
            username,
            created_at: now,
            expires_at: now + self.ttl,
        };

        tracing::debug!(
            user = %session.username,
            expires_at = %session.expires_at,
            "Session created"
        );
        inner.sessions.insert(token.clone(), session);

        token
    }

    fn lookup(&self, token: &SessionToken) -> Option<Session> {
        let now = self.clock.now();
        self.read()
            .sessions
            .get(token)
            .filter(|session| !session.is_expired(now))
            .cloned()
    }

    fn invalidate(&self, token: &SessionToken) -> bool {
        let removed = self.write().sessions.remove(token).is_some();
        if removed {
            tracing::debug!(token = %token, "Session invalidated");
        }
        removed
    }

    fn reap(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.write();

        let before = inner.sessions.len();
        inner.sessions.retain(|_, session| session.expires_at >= now);
        let removed = before - inner.sessions.len();

        if removed > 0 {
            tracing::info!(removed, remaining = inner.sessions.len(), "Reaped expired sessions");
        }
        removed
    }

    fn len(&self) -> usize {
        self.read().sessions.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kubeboard_testing::{ManualClock, test_clock};
    use std::collections::HashSet;

    fn store_with(clock: &ManualClock) -> InMemorySessionStore {
        InMemorySessionStore::new(&SessionConfig::default(), Arc::new(clock.clone()))
    }

    fn credential() -> Credential {
        Credential::from("apiVersion: v1\nkind: Config\n")
    }

    #[test]
    fn create_then_lookup() {
        let clock = test_clock();
        let store = store_with(&clock);

        let token = store.create(credential(), "admin".into(), None);
        let session = store.lookup(&token).expect("session should exist");

        assert_eq!(session.username, "admin");
        assert_eq!(session.credential, credential());
        assert_eq!(session.expires_at, clock.now() + Duration::hours(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_does_not_extend_expiry() {
        let clock = test_clock();
        let store = store_with(&clock);
        let token = store.create(credential(), "admin".into(), None);

        let first = store.lookup(&token).unwrap();
        clock.advance(Duration::minutes(30));
        let second = store.lookup(&token).unwrap();

        assert_eq!(first.expires_at, second.expires_at);
    }

    #[test]
    fn expired_session_is_invisible_before_reap() {
        let clock = test_clock();
        let store = store_with(&clock);
        let token = store.create(credential(), "admin".into(), None);

        clock.advance(Duration::hours(1));
        assert!(store.lookup(&token).is_some());

        clock.advance(Duration::seconds(1));
        assert!(store.lookup(&token).is_none());
        assert_eq!(store.len(), 1, "lazy expiry must not remove the entry");
    }

    #[test]
    fn replacing_invalidates_previous_token() {
        let clock = test_clock();
        let store = store_with(&clock);

        let first = store.create(credential(), "alice".into(), None);
        let second = store.create(credential(), "bob".into(), Some(&first));

        assert_ne!(first, second);
        assert!(store.lookup(&first).is_none());
        assert_eq!(store.lookup(&second).unwrap().username, "bob");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replacing_unknown_token_is_harmless() {
        let clock = test_clock();
        let store = store_with(&clock);

        let token = store.create(credential(), "alice".into(), Some(&SessionToken::new("stale")));
        assert!(store.lookup(&token).is_some());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let clock = test_clock();
        let store = store_with(&clock);
        let token = store.create(credential(), "admin".into(), None);

        assert!(store.invalidate(&token));
        assert!(!store.invalidate(&token));
        assert!(store.lookup(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn reap_removes_exactly_the_expired_subset() {
        let clock = test_clock();
        let store = store_with(&clock);

        let old = store.create(credential(), "old".into(), None);
        clock.advance(Duration::minutes(30));
        let middle = store.create(credential(), "middle".into(), None);
        clock.advance(Duration::minutes(31));
        let fresh = store.create(credential(), "fresh".into(), None);

        // `old` expired a minute ago, `middle` and `fresh` are still live.
        assert_eq!(store.reap(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.lookup(&middle).is_some());
        assert!(store.lookup(&fresh).is_some());
        assert!(store.lookup(&old).is_none());

        assert_eq!(store.reap(), 0);
    }

    #[test]
    fn reap_keeps_session_expiring_exactly_now() {
        let clock = test_clock();
        let store = store_with(&clock);
        let token = store.create(credential(), "admin".into(), None);

        clock.advance(Duration::hours(1));
        assert_eq!(store.reap(), 0);
        assert!(store.lookup(&token).is_some());
    }

    #[test]
    fn tokens_are_unique_under_a_frozen_clock() {
        let clock = test_clock();
        let store = store_with(&clock);

        let tokens: HashSet<_> = (0..100)
            .map(|_| store.create(credential(), "admin".into(), None))
            .collect();

        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn tokens_never_reused_after_clock_moves_backwards() {
        let clock = test_clock();
        let store = store_with(&clock);

        let first = store.create(credential(), "admin".into(), None);
        store.invalidate(&first);
        clock.advance(Duration::seconds(-10));
        let second = store.create(credential(), "admin".into(), None);

        assert_ne!(first, second);
        let first_nanos: i64 = first.as_str().parse().unwrap();
        let second_nanos: i64 = second.as_str().parse().unwrap();
        assert!(second_nanos > first_nanos);
    }

    #[test]
    fn concurrent_access_keeps_map_consistent() {
        let clock = test_clock();
        let store = store_with(&clock);

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut kept = Vec::new();
                    for round in 0..200 {
                        let token = store.create(credential(), format!("user-{worker}"), None);
                        assert!(store.lookup(&token).is_some());
                        if round % 2 == 0 {
                            store.invalidate(&token);
                        } else {
                            kept.push(token);
                        }
                        store.reap();
                    }
                    kept
                })
            })
            .collect();

        let kept: Vec<SessionToken> = workers
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker panicked"))
            .collect();

        let unique: HashSet<_> = kept.iter().cloned().collect();
        assert_eq!(unique.len(), kept.len());
        assert_eq!(store.len(), 8 * 100);
        assert!(kept.iter().all(|token| store.lookup(token).is_some()));
    }
}
