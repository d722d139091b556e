use argon2::password_hash::rand_core::{OsRng, RngCore};
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::Duration;

pub const SESSION_COOKIE: &str = "auth_token";
/// Session lifetime: 24 hours.
pub const SESSION_TTL_SECS: i64 = 86_400;

/// 256 bits of OS randomness, URL-safe base64. The token is the whole
/// credential; it carries no embedded meaning.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn build_session_cookie(token: String, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!insecure)
        .max_age(Duration::seconds(SESSION_TTL_SECS))
        .build()
}

pub fn clear_session_cookie(insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!insecure)
        .build()
}
