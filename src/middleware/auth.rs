use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::auth::SESSION_COOKIE;
use crate::db::models::AdminUser;
use crate::error::ComicError;
use crate::router::AppState;

/// Ensure the inbound request carries a valid session cookie.
/// The cookie value is looked up server-side; an unknown, expired or
/// unverifiable token rejects with 401. Protected API routes take this as
/// an argument and never run without it.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminUser);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(ComicError::Unauthenticated.into_response());
        };
        match state.auth.verify(cookie.value()).await {
            Some(admin) => Ok(Self(admin)),
            None => Err(ComicError::Unauthenticated.into_response()),
        }
    }
}
