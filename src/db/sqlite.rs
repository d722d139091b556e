use crate::catalog::SortOrder;
use crate::db::models::{Issue, NewIssue, SessionRecord};
use crate::db::schema::SQLITE_INIT;
use crate::error::ComicError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ComicError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(ComicError::Database)?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct CatalogStorage {
    pool: SqlitePool,
}

impl CatalogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ComicError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new issue and return the store-assigned id.
    pub async fn insert(&self, new: NewIssue) -> Result<i64, ComicError> {
        let pages_json = serde_json::to_string(&new.pages)?;
        let tags_json = serde_json::to_string(&new.tags)?;
        let result = sqlx::query(
            r#"
            INSERT INTO issues (title, description, thumbnail, pages, tags, release_date, rating)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.title)
        .bind(new.description)
        .bind(new.thumbnail)
        .bind(pages_json)
        .bind(tags_json)
        .bind(new.release_date.format("%Y-%m-%d").to_string())
        .bind(new.rating)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Full replace of every field by id. Returns false when the id is absent.
    pub async fn update_by_id(&self, id: i64, new: NewIssue) -> Result<bool, ComicError> {
        let pages_json = serde_json::to_string(&new.pages)?;
        let tags_json = serde_json::to_string(&new.tags)?;
        let result = sqlx::query(
            r#"UPDATE issues SET
                title = ?,
                description = ?,
                thumbnail = ?,
                pages = ?,
                tags = ?,
                release_date = ?,
                rating = ?
              WHERE id = ?"#,
        )
        .bind(new.title)
        .bind(new.description)
        .bind(new.thumbnail)
        .bind(pages_json)
        .bind(tags_json)
        .bind(new.release_date.format("%Y-%m-%d").to_string())
        .bind(new.rating)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. No soft-delete or versioning exists.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, ComicError> {
        let result = sqlx::query("DELETE FROM issues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Issue>, ComicError> {
        let row = sqlx::query(
            r#"SELECT id, title, description, thumbnail, pages, tags, release_date, rating
               FROM issues WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Full catalog in the requested order. No pagination cap: the catalog
    /// is a handful of issues, not a feed.
    pub async fn list(&self, sort: SortOrder) -> Result<Vec<Issue>, ComicError> {
        let order_by = match sort {
            SortOrder::Newest => "release_date DESC, id DESC",
            SortOrder::Oldest => "release_date ASC, id ASC",
            SortOrder::Rating => "rating DESC, id ASC",
        };
        let sql = format!(
            "SELECT id, title, description, thumbnail, pages, tags, release_date, rating \
             FROM issues ORDER BY {order_by}"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Issues with the next-lower and next-higher id. Ids are not
    /// necessarily contiguous after deletions.
    pub async fn adjacent(
        &self,
        id: i64,
    ) -> Result<(Option<Issue>, Option<Issue>), ComicError> {
        let prev = sqlx::query(
            r#"SELECT id, title, description, thumbnail, pages, tags, release_date, rating
               FROM issues WHERE id < ? ORDER BY id DESC LIMIT 1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Self::row_to_model)
        .transpose()?;

        let next = sqlx::query(
            r#"SELECT id, title, description, thumbnail, pages, tags, release_date, rating
               FROM issues WHERE id > ? ORDER BY id ASC LIMIT 1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Self::row_to_model)
        .transpose()?;

        Ok((prev, next))
    }

    pub async fn count(&self) -> Result<i64, ComicError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM issues")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<Issue, ComicError> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let description: String = row.try_get("description")?;
        let thumbnail: String = row.try_get("thumbnail")?;
        let pages_json: String = row.try_get("pages")?;
        let tags_json: String = row.try_get("tags")?;
        let release_str: String = row.try_get("release_date")?;
        let rating: f64 = row.try_get("rating")?;

        let pages: Vec<String> =
            serde_json::from_str(&pages_json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let tags: Vec<String> =
            serde_json::from_str(&tags_json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let release_date = NaiveDate::parse_from_str(&release_str, "%Y-%m-%d")
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Issue {
            id,
            title,
            description,
            thumbnail,
            pages,
            tags,
            release_date,
            rating,
        })
    }
}

/// Credential row including the Argon2 hash. Never leaves the auth layer.
#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct AuthStorage {
    pool: SqlitePool,
}

impl AuthStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminRow>, ComicError> {
        let row = sqlx::query("SELECT id, email, password_hash FROM admins WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::admin_from_row).transpose()
    }

    pub async fn get_admin_by_id(&self, id: i64) -> Result<Option<AdminRow>, ComicError> {
        let row = sqlx::query("SELECT id, email, password_hash FROM admins WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::admin_from_row).transpose()
    }

    pub async fn count_admins(&self) -> Result<i64, ComicError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn insert_admin(&self, email: &str, password_hash: &str) -> Result<i64, ComicError> {
        let result = sqlx::query("INSERT INTO admins (email, password_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn create_session(&self, session: &SessionRecord) -> Result<(), ComicError> {
        sqlx::query("INSERT INTO sessions (token, admin_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.admin_id)
            .bind(session.expires_at.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, ComicError> {
        let row = sqlx::query("SELECT token, admin_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::session_from_row).transpose()
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), ComicError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drop sessions past their expiry. Run opportunistically; a stale row
    /// is also rejected at verify time.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ComicError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn admin_from_row(row: SqliteRow) -> Result<AdminRow, ComicError> {
        Ok(AdminRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    fn session_from_row(row: SqliteRow) -> Result<SessionRecord, ComicError> {
        let token: String = row.try_get("token")?;
        let admin_id: i64 = row.try_get("admin_id")?;
        let expires_str: String = row.try_get("expires_at")?;
        let expires_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&expires_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(SessionRecord {
            token,
            admin_id,
            expires_at,
        })
    }
}
