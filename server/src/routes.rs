//! Router configuration for the dashboard.

use crate::access_log::access_log;
use crate::api::{session, workloads};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use kubeboard_web::request_id_layer;
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// The complete application service.
///
/// Trailing slashes are trimmed before routing, so `/api/v1/namespaces/`
/// reaches the same handler as `/api/v1/namespaces`.
pub type App = NormalizePath<Router>;

/// Build the complete Axum router.
///
/// Configures:
/// - `/upload` and `/logout`
/// - the authenticated JSON API under `/api/v1`
/// - static pages and assets from `static_dir`
///
/// Every response passes through access logging, HTTP tracing and request
/// id tagging.
pub fn build_router(state: AppState, static_dir: &Path) -> App {
    let api_routes = Router::new()
        .route("/namespaces", get(workloads::namespaces))
        .route("/deployments/namespace/:namespace", get(workloads::deployments))
        .route(
            "/deployments/:namespace/rollout/:name",
            post(workloads::restart_deployment),
        )
        .route("/statefulsets/namespace/:namespace", get(workloads::stateful_sets))
        .route(
            "/statefulsets/:namespace/rollout/:name",
            post(workloads::restart_stateful_set),
        )
        .route("/pods/namespace/:namespace", get(workloads::pods))
        .route("/pods/:namespace/rollout/:name", post(workloads::delete_pod))
        .route("/authcheck", get(session::authcheck));

    let router = Router::new()
        .route("/upload", post(session::upload))
        .route("/logout", post(session::logout))
        .nest("/api/v1", api_routes)
        // Static pages
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/dashboard", ServeFile::new(static_dir.join("dashboard.html")))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        .layer(middleware::from_fn_with_state(state.clone(), access_log))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
