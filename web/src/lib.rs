//! Axum integration for Kubeboard.
//!
//! The imperative shell shared by the dashboard's handlers:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, cookies
//! │  - Request metadata extraction          │  ← request ids, client ip
//! │  - Error envelope                       │  ← {"error": "..."}
//! ├─────────────────────────────────────────┤
//! │         Core / Auth / Cluster           │
//! │  - Sessions, status resolution          │
//! │  - Cluster access behind traits         │
//! └─────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cookies;
pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use cookies::{CookiePolicy, SESSION_COOKIE, cookie_value};
pub use error::AppError;
pub use extractors::{ClientIp, RequestId, SessionCookie, UserAgent};
pub use middleware::{REQUEST_ID_HEADER, RequestIdLayer, request_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
