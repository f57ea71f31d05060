//! Per-request access logging.
//!
//! One event per request on the [`ACCESS_LOG_TARGET`] target. The subscriber
//! installed by [`telemetry`](crate::telemetry) routes that target to the
//! access log file only.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use kubeboard_auth::SessionToken;
use kubeboard_web::{ClientIp, RequestId, SessionCookie, UserAgent};

/// Tracing target of access log events.
pub const ACCESS_LOG_TARGET: &str = "access_log";

/// Recorded in place of a username when the request has no live session.
const ANONYMOUS: &str = "Unauthorized";

/// Middleware emitting one access log event per request.
///
/// The user is resolved before the handler runs, so an upload is logged as
/// `Unauthorized` and a logout under the user it ended.
pub async fn access_log(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    ClientIp(client_ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    cookie: SessionCookie,
    request: Request,
    next: Next,
) -> Response {
    let user = cookie
        .token()
        .and_then(|token| state.sessions.lookup(&SessionToken::new(token)))
        .map_or_else(|| ANONYMOUS.to_owned(), |session| session.username);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    tracing::info!(
        target: ACCESS_LOG_TARGET,
        request_id = %request_id,
        user = %user,
        client_ip = %client_ip,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        user_agent = %user_agent,
        "request completed"
    );

    response
}
