use crate::auth::{SESSION_COOKIE, build_session_cookie, clear_session_cookie};
use crate::db::models::AdminUser;
use crate::error::ComicError;
use crate::router::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: AdminUser,
}

/// POST /api/auth -> sets the session cookie on success. Failure is a 401
/// with a generic message; which field was wrong is never disclosed.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ComicError> {
    match state.auth.login(&body.email, &body.password).await {
        Ok((admin, session)) => {
            let jar = jar.add(build_session_cookie(session.token, state.insecure_cookie));
            info!(admin_id = admin.id, "login succeeded");
            Ok((
                jar,
                Json(LoginResponse {
                    success: true,
                    message: "Login successful".to_string(),
                }),
            )
                .into_response())
        }
        Err(ComicError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid credentials".to_string(),
            }),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /api/auth/verify -> the admin behind the cookie, or 401.
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<VerifyResponse>, ComicError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(ComicError::Unauthenticated)?;
    match state.auth.verify(&token).await {
        Some(user) => Ok(Json(VerifyResponse {
            success: true,
            user,
        })),
        None => Err(ComicError::Unauthenticated),
    }
}

/// POST /api/auth/logout -> drops the session row and clears the cookie.
/// Always succeeds from the client's point of view.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let _ = state.auth.logout(cookie.value()).await;
    }
    let jar = jar.remove(clear_session_cookie(state.insecure_cookie));
    (
        jar,
        Json(LoginResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
        .into_response()
}
