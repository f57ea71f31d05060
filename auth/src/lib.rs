//! # Kubeboard Sessions
//!
//! Session lifecycle for the dashboard: an uploaded kubeconfig becomes a
//! [`Session`] keyed by an opaque [`SessionToken`], which the browser carries
//! in a cookie until it logs out, re-uploads, or the session expires.
//!
//! ## Architecture
//!
//! ```text
//! upload ──▶ SessionStore::create ──▶ token (cookie)
//!                    │
//! request ──▶ authenticate(token) ──▶ Session ──▶ credential
//!                    │
//! SessionReaper ──▶ SessionStore::reap (every interval)
//! ```
//!
//! Storage sits behind the [`SessionStore`] trait; the process-local
//! [`InMemorySessionStore`] is the only implementation.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod error;
pub mod providers;
pub mod reaper;
pub mod state;
pub mod stores;

pub use config::SessionConfig;
pub use error::{AuthError, Result};
pub use providers::SessionStore;
pub use reaper::{ReaperHandle, SessionReaper};
pub use state::{Session, SessionToken};
pub use stores::InMemorySessionStore;

/// Resolve the session named by a request's cookie token.
///
/// # Errors
///
/// - [`AuthError::MissingToken`] when no token (or an empty one) was sent
/// - [`AuthError::SessionNotFound`] when the token is unknown or expired
pub fn authenticate(store: &dyn SessionStore, token: Option<&str>) -> Result<Session> {
    let token = token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    store
        .lookup(&SessionToken::new(token))
        .ok_or(AuthError::SessionNotFound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kubeboard_core::Credential;
    use kubeboard_testing::test_clock;
    use std::sync::Arc;

    #[test]
    fn authenticate_outcomes() {
        let clock = test_clock();
        let store = InMemorySessionStore::new(&SessionConfig::default(), Arc::new(clock.clone()));
        let token = store.create(Credential::from("kind: Config"), "admin".into(), None);

        assert_eq!(authenticate(&store, None), Err(AuthError::MissingToken));
        assert_eq!(authenticate(&store, Some("")), Err(AuthError::MissingToken));
        assert_eq!(authenticate(&store, Some("42")), Err(AuthError::SessionNotFound));

        let session = authenticate(&store, Some(token.as_str())).unwrap();
        assert_eq!(session.username, "admin");

        clock.advance(chrono::Duration::hours(2));
        assert_eq!(
            authenticate(&store, Some(token.as_str())),
            Err(AuthError::SessionNotFound)
        );
    }
}
