//! Request extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use realtime::SharedSession;
use serde::Deserialize;

use crate::response::ApiError;

/// Header set by the dashboard's timed reload.
pub const AUTO_REFRESH_HEADER: &str = "X-Auto-Refresh";

/// The caller's session, attached by the session middleware.
#[derive(Clone)]
pub struct Session(pub SharedSession);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SharedSession>()
            .cloned()
            .map(Session)
            .ok_or_else(|| ApiError::internal("session middleware not installed"))
    }
}

/// Whether the request is an automatic reload rather than a visit.
///
/// Set by `?autorefresh=1` or an `X-Auto-Refresh: 1` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRefresh(pub bool);

#[derive(Deserialize)]
struct RefreshQuery {
    autorefresh: Option<String>,
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}

#[async_trait]
impl<S> FromRequestParts<S> for AutoRefresh
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(AUTO_REFRESH_HEADER)
            .and_then(|h| h.to_str().ok())
            .is_some_and(is_truthy);

        let from_query = Query::<RefreshQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.autorefresh)
            .is_some_and(|v| is_truthy(&v));

        Ok(AutoRefresh(from_header || from_query))
    }
}
