//! Session cookie middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::state::AppState;

/// Attaches the caller's [`SharedSession`](realtime::SharedSession) to the
/// request extensions, issuing a session cookie on first contact.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.sessions.config().cookie_name.clone();
    let known = jar
        .get(&cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (session, created) = state.sessions.resolve(known).await;
    let user_id = session.lock().await.user_id();
    request.extensions_mut().insert(session);

    let response = next.run(request).await;
    if !created {
        return response;
    }

    let cookie = Cookie::build((cookie_name, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}
