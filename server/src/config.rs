//! Configuration management for the dashboard server.
//!
//! Loads configuration from environment variables with sensible defaults.

use kubeboard_auth::SessionConfig;
use kubeboard_web::CookiePolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Session configuration
    pub session: SessionSettings,
    /// Cluster access configuration
    pub cluster: ClusterConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Directory holding `index.html`, `dashboard.html` and the asset folders
    pub static_dir: PathBuf,
    /// Grace period in seconds for background tasks after the server stops
    pub shutdown_timeout: u64,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Session lifetime and cookie `Max-Age`, in seconds (default: 1 hour)
    pub ttl: u64,
    /// Seconds between sweeps of expired sessions (default: 5 minutes)
    pub reap_interval: u64,
    /// Mark the session cookie `Secure`.
    ///
    /// Default: `false`, so the dashboard works over plain HTTP. Enable it
    /// whenever the server sits behind TLS.
    pub cookie_secure: bool,
}

/// Cluster access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Per-call timeout in seconds for cluster API requests
    pub timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// File receiving one line per request
    pub access_log: PathBuf,
}

/// Largest TTL accepted, in seconds (one year).
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str, default| parse_or(&lookup, key, default);
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Self {
            server: ServerConfig {
                host: text("KUBEBOARD_HOST", "0.0.0.0"),
                port: parse_or(&lookup, "KUBEBOARD_PORT", 8080),
                static_dir: text("KUBEBOARD_STATIC_DIR", "public").into(),
                shutdown_timeout: parsed("KUBEBOARD_SHUTDOWN_TIMEOUT_SECS", 10),
            },
            session: SessionSettings {
                ttl: parsed("KUBEBOARD_SESSION_TTL_SECS", 3600).min(MAX_TTL_SECS),
                reap_interval: parsed("KUBEBOARD_REAP_INTERVAL_SECS", 300).max(1),
                cookie_secure: parse_or(&lookup, "KUBEBOARD_COOKIE_SECURE", false),
            },
            cluster: ClusterConfig {
                timeout: parsed("KUBEBOARD_CLUSTER_TIMEOUT_SECS", 30).max(1),
            },
            logging: LoggingConfig {
                access_log: text("KUBEBOARD_ACCESS_LOG", "logs/access.log").into(),
            },
        }
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Session store and reaper settings.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_ttl(chrono::Duration::seconds(self.ttl_secs()))
            .with_reap_interval(Duration::from_secs(self.session.reap_interval))
    }

    /// Attributes of the session cookie.
    #[must_use]
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(self.ttl_secs()).with_secure(self.session.cookie_secure)
    }

    /// Timeout applied to each cluster call.
    #[must_use]
    pub const fn cluster_timeout(&self) -> Duration {
        Duration::from_secs(self.cluster.timeout)
    }

    /// Grace period for stopping background tasks.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    fn ttl_secs(&self) -> i64 {
        i64::try_from(self.session.ttl.min(MAX_TTL_SECS)).unwrap_or(3600)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
