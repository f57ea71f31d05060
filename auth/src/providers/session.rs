//! Session store trait.

use crate::state::{Session, SessionToken};
use kubeboard_core::Credential;

/// Session store.
///
/// This trait abstracts over session storage. Implementations are shared
/// between concurrently running request handlers and the background reaper,
/// so every method takes `&self` and must be internally synchronised.
///
/// # Implementation Notes
///
/// - Operations are infallible; an absent session is not an error
/// - No sliding expiration: reads never extend `expires_at`
/// - Expired sessions are invisible to [`lookup`](SessionStore::lookup) even
///   before [`reap`](SessionStore::reap) removes them
pub trait SessionStore: Send + Sync {
    /// Create a session and return its token.
    ///
    /// When `replaces` names a session (the browser re-uploaded a
    /// kubeconfig), that session is removed in the same critical section, so
    /// the previous credential stops working immediately.
    fn create(
        &self,
        credential: Credential,
        username: String,
        replaces: Option<&SessionToken>,
    ) -> SessionToken;

    /// Get a live session.
    ///
    /// # Returns
    ///
    /// The session if found and not expired.
    fn lookup(&self, token: &SessionToken) -> Option<Session>;

    /// Delete a session.
    ///
    /// Idempotent. Returns `true` when a session was actually removed.
    fn invalidate(&self, token: &SessionToken) -> bool;

    /// Remove every session whose expiry is strictly before now.
    ///
    /// Returns the number of sessions removed.
    fn reap(&self) -> usize;

    /// Number of stored sessions, expired-but-unreaped ones included.
    fn len(&self) -> usize;

    /// Whether the store holds no sessions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
