//! Namespace and workload endpoints.
//!
//! All of them require a session and answer `[]` for an empty namespace.
//! Rollout endpoints answer 200 with an empty body.

use crate::auth::AuthenticatedSession;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kubeboard_core::{DeploymentView, PodView, StatefulSetView};
use kubeboard_web::WebResult;

/// `GET /api/v1/namespaces`
///
/// # Errors
///
/// 500 when the credential no longer validates or the cluster call fails.
pub async fn namespaces(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<String>>> {
    Ok(Json(state.resources.namespaces(&session).await?))
}

/// `GET /api/v1/deployments/namespace/:namespace`
///
/// # Errors
///
/// 500 when the credential no longer validates or the cluster call fails.
pub async fn deployments(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> WebResult<Json<Vec<DeploymentView>>> {
    Ok(Json(state.resources.deployments(&session, &namespace).await?))
}

/// `GET /api/v1/statefulsets/namespace/:namespace`
///
/// # Errors
///
/// 500 when the credential no longer validates or the cluster call fails.
pub async fn stateful_sets(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> WebResult<Json<Vec<StatefulSetView>>> {
    Ok(Json(state.resources.stateful_sets(&session, &namespace).await?))
}

/// `GET /api/v1/pods/namespace/:namespace`
///
/// # Errors
///
/// 500 when the credential no longer validates or the cluster call fails.
pub async fn pods(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> WebResult<Json<Vec<PodView>>> {
    Ok(Json(state.resources.pods(&session, &namespace).await?))
}

/// `POST /api/v1/deployments/:namespace/rollout/:name`
///
/// # Errors
///
/// 500 when the Deployment cannot be read or written back.
pub async fn restart_deployment(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> WebResult<StatusCode> {
    state
        .resources
        .restart_deployment(&session, &namespace, &name)
        .await?;
    Ok(StatusCode::OK)
}

/// `POST /api/v1/statefulsets/:namespace/rollout/:name`
///
/// # Errors
///
/// 500 when the StatefulSet cannot be read or written back.
pub async fn restart_stateful_set(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> WebResult<StatusCode> {
    state
        .resources
        .restart_stateful_set(&session, &namespace, &name)
        .await?;
    Ok(StatusCode::OK)
}

/// `POST /api/v1/pods/:namespace/rollout/:name`
///
/// Deletes the pod; its controller schedules a replacement.
///
/// # Errors
///
/// 500 when the delete fails.
pub async fn delete_pod(
    AuthenticatedSession(session): AuthenticatedSession,
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> WebResult<StatusCode> {
    state.resources.delete_pod(&session, &namespace, &name).await?;
    Ok(StatusCode::OK)
}
