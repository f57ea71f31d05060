//! Session state types.

use chrono::{DateTime, Utc};
use kubeboard_core::Credential;
use std::fmt;

/// Opaque session token handed to the browser in the `sessionToken` cookie.
///
/// Tokens are decimal nanosecond timestamps. The issuing store keeps them
/// strictly increasing, so a token is never handed out twice by the same
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token received from a client.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token issued for the given nanosecond timestamp.
    #[must_use]
    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos.to_string())
    }

    /// Borrow the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated operator session.
///
/// Created when a kubeconfig upload validates, destroyed by logout, by a
/// later upload from the same browser, or by expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Token identifying this session.
    pub token: SessionToken,

    /// Uploaded kubeconfig, re-validated on every request.
    pub credential: Credential,

    /// User named by the kubeconfig's current context.
    pub username: String,

    /// Session creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Absolute expiry. The session is unusable once `now > expires_at`.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_is_exclusive_of_the_deadline() {
        let created_at = DateTime::<Utc>::UNIX_EPOCH;
        let session = Session {
            token: SessionToken::from_nanos(1),
            credential: Credential::from("kind: Config"),
            username: "admin".into(),
            created_at,
            expires_at: created_at + Duration::hours(1),
        };

        assert!(!session.is_expired(created_at + Duration::hours(1)));
        assert!(session.is_expired(created_at + Duration::hours(1) + Duration::nanoseconds(1)));
    }

    #[test]
    fn token_display() {
        let token = SessionToken::from_nanos(1_700_000_000_123_456_789);
        assert_eq!(token.to_string(), "1700000000123456789");
        assert_eq!(token, SessionToken::new("1700000000123456789"));
    }
}
