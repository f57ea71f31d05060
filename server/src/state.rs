//! Application state for the dashboard HTTP server.

use crate::resources::ResourceAggregator;
use kubeboard_auth::SessionStore;
use kubeboard_web::CookiePolicy;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Session store; the only mutable state shared between requests.
    pub sessions: Arc<dyn SessionStore>,

    /// Cluster access and status resolution.
    pub resources: Arc<ResourceAggregator>,

    /// Attributes of the session cookie.
    pub cookies: CookiePolicy,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        resources: ResourceAggregator,
        cookies: CookiePolicy,
    ) -> Self {
        Self {
            sessions,
            resources: Arc::new(resources),
            cookies,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("resources", &self.resources)
            .field("cookies", &self.cookies)
            .finish()
    }
}
