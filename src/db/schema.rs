//! SQL DDL for initializing the comic store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `issues`: one row per published issue; `pages` and `tags` are JSON
///   arrays serialized as text, `release_date` is an ISO `YYYY-MM-DD` date
/// - `admins`: seeded credential rows, Argon2 hashes only
/// - `sessions`: server-side session tokens with an RFC3339 expiry
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    thumbnail TEXT NOT NULL,
    pages TEXT NOT NULL, -- JSON array, display order
    tags TEXT NOT NULL, -- JSON array, deduplicated
    release_date TEXT NOT NULL, -- YYYY-MM-DD
    rating REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_issues_release_date ON issues(release_date);

CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    admin_id INTEGER NOT NULL REFERENCES admins(id) ON DELETE CASCADE,
    expires_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;
