//! Auth gate: Argon2 credential verification and server-side sessions.
//!
//! The cookie carries nothing but a random token; validity is always
//! re-derived by looking the token up in the `sessions` table. Any lookup
//! failure counts as unauthenticated — protected routes fail closed.

pub mod password;
pub mod session;

use crate::db::models::{AdminUser, SessionRecord};
use crate::db::sqlite::AuthStorage;
use crate::error::ComicError;
use chrono::Utc;
use tracing::{error, info, warn};

pub use session::{SESSION_COOKIE, build_session_cookie, clear_session_cookie};

#[derive(Clone)]
pub struct AuthService {
    storage: AuthStorage,
}

impl AuthService {
    pub fn new(storage: AuthStorage) -> Self {
        Self { storage }
    }

    /// Seed the admin table from configuration when it is empty. Admin
    /// credentials are static seed data; they are never created through
    /// the app itself.
    pub async fn seed_admin(
        &self,
        email: &str,
        password: Option<&str>,
    ) -> Result<(), ComicError> {
        if self.storage.count_admins().await? > 0 {
            return Ok(());
        }
        match password {
            Some(password) if !password.is_empty() => {
                let hash = password::hash_password(password)?;
                let id = self.storage.insert_admin(email, &hash).await?;
                info!(id, email, "seeded admin credential");
            }
            _ => {
                warn!("admin table is empty and no seed password configured; login is impossible");
            }
        }
        Ok(())
    }

    /// Exact email lookup + Argon2 verify. Unknown email and wrong password
    /// are indistinguishable to the caller; a dummy verification runs for
    /// unknown emails so both paths cost the same.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AdminUser, SessionRecord), ComicError> {
        let admin = self.storage.get_admin_by_email(email).await?;
        let Some(admin) = admin else {
            password::verify_dummy(password);
            return Err(ComicError::InvalidCredentials);
        };
        if !password::verify_password(password, &admin.password_hash) {
            return Err(ComicError::InvalidCredentials);
        }

        let record = SessionRecord {
            token: session::generate_token(),
            admin_id: admin.id,
            expires_at: Utc::now() + chrono::Duration::seconds(session::SESSION_TTL_SECS),
        };
        self.storage.create_session(&record).await?;
        info!(admin_id = admin.id, "session created");

        Ok((
            AdminUser {
                id: admin.id,
                email: admin.email,
            },
            record,
        ))
    }

    /// Resolve a cookie token to its admin. `None` for unknown, expired and
    /// store-failure cases alike.
    pub async fn verify(&self, token: &str) -> Option<AdminUser> {
        let session = match self.storage.get_session(token).await {
            Ok(s) => s?,
            Err(e) => {
                error!(error = %e, "session lookup failed; treating as unauthenticated");
                return None;
            }
        };
        if session.is_expired(Utc::now()) {
            // Drop the stale row; failure here changes nothing.
            if let Err(e) = self.storage.delete_session(token).await {
                warn!(error = %e, "failed to drop expired session");
            }
            return None;
        }
        match self.storage.get_admin_by_id(session.admin_id).await {
            Ok(Some(admin)) => Some(AdminUser {
                id: admin.id,
                email: admin.email,
            }),
            Ok(None) => None,
            Err(e) => {
                error!(error = %e, "admin lookup failed; treating as unauthenticated");
                None
            }
        }
    }

    pub async fn logout(&self, token: &str) -> Result<(), ComicError> {
        self.storage.delete_session(token).await
    }

    /// Opportunistic cleanup of sessions past their expiry.
    pub async fn purge_expired(&self) -> Result<u64, ComicError> {
        self.storage.purge_expired(Utc::now()).await
    }
}
