//! Custom Axum extractors.
//!
//! This module contains extractors for the request metadata the dashboard
//! logs and authenticates with:
//! - `RequestId`: the id assigned by [`request_id_layer`](crate::middleware::request_id_layer)
//! - `ClientIp`: client address from proxy headers or the connection
//! - `UserAgent`: the `User-Agent` header
//! - `SessionCookie`: the raw session token, if the browser sent one
//!
//! All of them are infallible.

use crate::cookies::{SESSION_COOKIE, cookie_value};
use crate::middleware::REQUEST_ID_HEADER;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header::USER_AGENT, request::Parts},
};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// Request id for log correlation.
///
/// Read from request extensions when the middleware is installed, else from
/// the `X-Request-ID` header, else freshly generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(id))
    }
}

/// Client IP address.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Connection address, when the server was started with connect info
/// 4. `127.0.0.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let forwarded = header_str(headers, "X-Forwarded-For")
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse().ok());
        let real_ip = || header_str(headers, "X-Real-IP").and_then(|v| v.trim().parse().ok());
        let peer = || {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        };

        Ok(Self(
            forwarded
                .or_else(real_ip)
                .or_else(peer)
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        ))
    }
}

/// User-Agent header, or `"Unknown"` when absent or not ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let agent = header_str(&parts.headers, USER_AGENT.as_str()).unwrap_or("Unknown");
        Ok(Self(agent.to_owned()))
    }
}

/// The `sessionToken` cookie, if present and non-empty.
///
/// This only reads the cookie; checking it against the session store is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie(pub Option<String>);

impl SessionCookie {
    /// The token, if one was sent.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, SESSION_COOKIE)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        Ok(Self(token))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
