//! Error types for request authentication.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Why a request could not be authenticated.
///
/// Every variant is reported to clients as a plain 401; the distinction only
/// shows up in logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no session cookie.
    #[error("Missing session token")]
    MissingToken,

    /// The token is unknown or its session has expired.
    #[error("Session not found")]
    SessionNotFound,
}
