use crate::error::ComicError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

/// Hash verified against when a login names an unknown email, so that
/// unknown-email and wrong-password failures take comparable time.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("placeholder-for-timing-equalization")
        .unwrap_or_default()
});

pub fn hash_password(password: &str) -> Result<String, ComicError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}
