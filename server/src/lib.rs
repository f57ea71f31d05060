//! # Kubeboard
//!
//! HTTP backend of a Kubernetes rollout dashboard. An operator uploads a
//! kubeconfig, receives a session cookie, and can then list Deployments,
//! StatefulSets and Pods with a one-line rollout status each, or trigger
//! restarts.
//!
//! ## Request flow
//!
//! ```text
//! request ─▶ AuthenticatedSession ─▶ ResourceAggregator ─▶ CredentialValidator
//!                  │ 401                     │                     │
//!                  ▼                         ▼                     ▼
//!            SessionStore            status resolution      ClusterClient
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod access_log;
pub mod api;
pub mod auth;
pub mod config;
pub mod resources;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use resources::{ResourceAggregator, ResourceError};
pub use routes::{App, build_router};
pub use state::AppState;

/// Resolve when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
