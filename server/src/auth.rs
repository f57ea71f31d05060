//! Request authentication.
//!
//! Handlers that take an [`AuthenticatedSession`] only run for requests
//! carrying a live session cookie; everything else is rejected with a 401
//! before the handler, and therefore the cluster, is reached.

use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kubeboard_auth::{Session, authenticate};
use kubeboard_web::{AppError, SessionCookie};

/// The session behind the request's `sessionToken` cookie.
///
/// Expiry is checked on every request; reading a session never extends it.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(SessionCookie(token)) = SessionCookie::from_request_parts(parts, state).await;

        authenticate(state.sessions.as_ref(), token.as_deref())
            .map(Self)
            .map_err(|reason| {
                tracing::debug!(%reason, path = %parts.uri.path(), "Rejected unauthenticated request");
                AppError::unauthorized()
            })
    }
}
