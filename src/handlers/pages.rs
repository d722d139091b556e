//! Page-level route interception, the server-side equivalent of the
//! navigation guard: `/dashboard` requires a valid session, `/auth`
//! bounces an already-authenticated admin back to the dashboard. Any
//! verification failure counts as unauthenticated (fail closed).

use crate::auth::SESSION_COOKIE;
use crate::router::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

// Static mount points for the client app; rendering proper is out of scope.
const DASHBOARD_SHELL: &str =
    "<!doctype html><html><body><div id=\"dashboard-root\"></div></body></html>";
const AUTH_SHELL: &str = "<!doctype html><html><body><div id=\"auth-root\"></div></body></html>";

async fn has_valid_session(state: &AppState, jar: &CookieJar) -> bool {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.auth.verify(cookie.value()).await.is_some(),
        None => false,
    }
}

/// GET /dashboard and /dashboard/{*rest}
pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    if has_valid_session(&state, &jar).await {
        Html(DASHBOARD_SHELL).into_response()
    } else {
        Redirect::temporary("/auth").into_response()
    }
}

/// GET /auth
pub async fn auth_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if has_valid_session(&state, &jar).await {
        Redirect::temporary("/dashboard").into_response()
    } else {
        Html(AUTH_SHELL).into_response()
    }
}
