//! Session configuration.

use chrono::Duration;

/// Lifetime and housekeeping settings for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time from creation until a session expires.
    ///
    /// Default: 1 hour
    pub ttl: Duration,

    /// How often the background reaper sweeps expired sessions.
    ///
    /// Default: 5 minutes
    pub reap_interval: std::time::Duration,
}

impl SessionConfig {
    /// Create configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl: Duration::hours(1),
            reap_interval: std::time::Duration::from_secs(5 * 60),
        }
    }

    /// Set session time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the reaper interval.
    #[must_use]
    pub const fn with_reap_interval(mut self, interval: std::time::Duration) -> Self {
        self.reap_interval = interval;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
