//! Session endpoints.

use crate::auth::AuthenticatedSession;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::header,
    response::IntoResponse,
};
use kubeboard_auth::SessionToken;
use kubeboard_core::Credential;
use kubeboard_web::{AppError, SessionCookie, WebResult};
use serde::Serialize;
use tracing::info;

/// Multipart field carrying the kubeconfig file.
pub const KUBECONFIG_FIELD: &str = "kubeconfig";

const FAILED_TO_GET_FILE: &str = "Failed to get file";
const FAILED_TO_READ_FILE: &str = "Failed to read kubeconfig content";

/// Response body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Fixed confirmation text.
    pub message: &'static str,
    /// Namespaces visible to the uploaded credential.
    pub namespaces: Vec<String>,
    /// User of the kubeconfig's current context.
    pub user: String,
}

/// Response body of `GET /api/v1/authcheck`.
#[derive(Debug, Serialize)]
pub struct AuthCheckResponse {
    /// Username of the session.
    pub user: String,
}

/// Response body of `POST /logout`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: &'static str,
}

/// `POST /upload`
///
/// Validates the uploaded kubeconfig, lists namespaces with it, and opens a
/// session. A session already held by this browser is replaced.
///
/// # Errors
///
/// - 400 when the file is missing or the kubeconfig does not validate
/// - 500 when the file cannot be read or the cluster cannot be queried
pub async fn upload(
    State(state): State<AppState>,
    SessionCookie(previous): SessionCookie,
    multipart: Result<Multipart, MultipartRejection>,
) -> WebResult<impl IntoResponse> {
    let mut multipart = multipart
        .map_err(|rejection| AppError::bad_request(FAILED_TO_GET_FILE).with_source(rejection))?;
    let credential = read_kubeconfig(&mut multipart).await?;

    let connection = state.resources.connect(&credential).await?;

    let previous = previous.map(SessionToken::new);
    let token = state
        .sessions
        .create(credential, connection.username.clone(), previous.as_ref());

    info!(
        user = %connection.username,
        namespaces = connection.namespaces.len(),
        replaced = previous.is_some(),
        "Kubeconfig validated, session opened"
    );

    Ok((
        [(header::SET_COOKIE, state.cookies.issue(token.as_str()))],
        Json(UploadResponse {
            message: "Kubeconfig validated successfully",
            namespaces: connection.namespaces,
            user: connection.username,
        }),
    ))
}

/// First `kubeconfig` field of the form.
async fn read_kubeconfig(multipart: &mut Multipart) -> WebResult<Credential> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(FAILED_TO_GET_FILE).with_source(e))?
    {
        if field.name() == Some(KUBECONFIG_FIELD) {
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::internal(FAILED_TO_READ_FILE).with_source(e))?;
            return Ok(Credential::from(content.to_vec()));
        }
    }

    Err(AppError::bad_request(FAILED_TO_GET_FILE))
}

/// `GET /api/v1/authcheck`
pub async fn authcheck(
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<AuthCheckResponse> {
    Json(AuthCheckResponse {
        user: session.username,
    })
}

/// `POST /logout`
///
/// Always succeeds; a missing or unknown cookie is not an error.
pub async fn logout(
    State(state): State<AppState>,
    SessionCookie(token): SessionCookie,
) -> impl IntoResponse {
    if let Some(token) = token {
        let removed = state.sessions.invalidate(&SessionToken::new(token));
        info!(removed, "Logged out");
    }

    (
        [(header::SET_COOKIE, state.cookies.clear())],
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}
