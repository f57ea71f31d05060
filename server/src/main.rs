//! Kubeboard server binary.

use anyhow::Context;
use axum::ServiceExt;
use axum::extract::Request;
use kubeboard::{AppState, Config, ResourceAggregator, build_router, shutdown_signal, telemetry};
use kubeboard_auth::{InMemorySessionStore, SessionReaper, SessionStore};
use kubeboard_cluster::KubeconfigValidator;
use kubeboard_core::environment::{Clock, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    telemetry::init(&config.logging.access_log)?;

    info!("Starting Kubeboard");
    info!(
        bind = %config.bind_address(),
        static_dir = %config.server.static_dir.display(),
        access_log = %config.logging.access_log.display(),
        session_ttl_secs = config.session.ttl,
        "Configuration loaded"
    );
    if !config.session.cookie_secure {
        warn!("Session cookie is not marked Secure; set KUBEBOARD_COOKIE_SECURE=true behind TLS");
    }
    warn!(
        "Uploaded kubeconfigs may carry exec or auth-provider plugins, which run as processes \
         on this host; expose the dashboard to trusted operators only"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session_config = config.session_config();

    let sessions: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(&session_config, Arc::clone(&clock)));
    let reaper = SessionReaper::spawn(Arc::clone(&sessions), session_config.reap_interval);

    let resources = ResourceAggregator::new(
        Arc::new(KubeconfigValidator::new()),
        clock,
        config.cluster_timeout(),
    );
    let state = AppState::new(sessions, resources, config.cookie_policy());
    let app = build_router(state, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(address = %listener.local_addr()?, "HTTP server listening");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serving HTTP")?;

    info!("HTTP server stopped, stopping session reaper");
    if tokio::time::timeout(config.shutdown_timeout(), reaper.shutdown())
        .await
        .is_err()
    {
        warn!("Session reaper did not stop within the shutdown timeout");
    }

    info!("Shutdown complete");
    Ok(())
}
