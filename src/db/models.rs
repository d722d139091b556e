use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One published comic issue. `pages` order is display order and is
/// meaningful; `id` uniquely orders issues for prev/next navigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub pages: Vec<String>,
    pub tags: Vec<String>,
    pub release_date: NaiveDate,
    pub rating: f64,
}

/// Insert/update payload: an [`Issue`] without a store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub pages: Vec<String>,
    pub tags: Vec<String>,
    pub release_date: NaiveDate,
    pub rating: f64,
}

impl From<Issue> for NewIssue {
    fn from(i: Issue) -> Self {
        Self {
            title: i.title,
            description: i.description,
            thumbnail: i.thumbnail,
            pages: i.pages,
            tags: i.tags,
            release_date: i.release_date,
            rating: i.rating,
        }
    }
}

/// Lightweight projection used for prev/next navigation links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueSummary {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
}

impl From<&Issue> for IssueSummary {
    fn from(i: &Issue) -> Self {
        Self {
            id: i.id,
            title: i.title.clone(),
            thumbnail: i.thumbnail.clone(),
        }
    }
}

/// Admin credential row, minus the hash. This is the shape handed to
/// handlers; the password hash never leaves the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
}

/// Server-side session row backing the `auth_token` cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub token: String,
    pub admin_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
