//! Dashboard form controller: the draft an admin edits before it becomes an
//! insert or a full-replace update, plus the multi-file upload batch.
//!
//! No optimistic updates and no rollback: a failed write logs the error and
//! leaves the draft populated so the admin can retry.

use crate::catalog::{CatalogRepository, SortOrder};
use crate::db::models::{Issue, NewIssue};
use crate::error::ComicError;
use crate::media::MediaStore;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// In-progress issue record. Field setters normalize as they go: tags are
/// trimmed and deduplicated, the rating clamps to [0, 5].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub pages: Vec<String>,
    pub tags: Vec<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
}

impl IssueDraft {
    pub fn from_new(new: NewIssue) -> Self {
        let mut draft = Self {
            title: new.title,
            description: new.description,
            thumbnail: new.thumbnail,
            pages: new.pages,
            tags: Vec::new(),
            release_date: Some(new.release_date),
            rating: new.rating.clamp(MIN_RATING, MAX_RATING),
        };
        for tag in new.tags {
            draft.add_tag(&tag);
        }
        draft
    }

    pub fn from_issue(issue: Issue) -> Self {
        Self::from_new(issue.into())
    }

    /// Add-on-Enter semantics: trimmed, ignored when empty or already
    /// present (case-insensitive).
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return;
        }
        self.tags.push(tag.to_string());
    }

    /// Remove-by-click semantics.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| !t.eq_ignore_ascii_case(tag));
    }

    pub fn set_rating(&mut self, rating: f64) {
        self.rating = rating.clamp(MIN_RATING, MAX_RATING);
    }

    /// Drag-and-drop reorder: remove the dragged page, reinsert at the drop
    /// index (splice, not swap).
    pub fn move_page(&mut self, from: usize, to: usize) {
        if from >= self.pages.len() {
            return;
        }
        let page = self.pages.remove(from);
        let to = to.min(self.pages.len());
        self.pages.insert(to, page);
    }

    pub fn push_page(&mut self, url: String) {
        self.pages.push(url);
    }

    /// Validate and produce the write payload.
    pub fn build(&self) -> Result<NewIssue, ComicError> {
        if self.title.trim().is_empty() {
            return Err(ComicError::InvalidDraft("title must not be empty".into()));
        }
        if self.pages.is_empty() {
            return Err(ComicError::InvalidDraft(
                "an issue needs at least one page".into(),
            ));
        }
        let release_date = self
            .release_date
            .ok_or_else(|| ComicError::InvalidDraft("release date is required".into()))?;
        Ok(NewIssue {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            thumbnail: self.thumbnail.clone(),
            pages: self.pages.clone(),
            tags: self.tags.clone(),
            release_date,
            rating: self.rating.clamp(MIN_RATING, MAX_RATING),
        })
    }
}

/// Result of a successful submit: the written issue's id plus the freshly
/// re-fetched catalog (there is no optimistic update).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmitOutcome {
    pub id: i64,
    pub catalog: Vec<Issue>,
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    draft: IssueDraft,
    editing: Option<i64>,
}

impl FormController {
    pub fn create(draft: IssueDraft) -> Self {
        Self {
            draft,
            editing: None,
        }
    }

    pub fn edit(id: i64, issue: Issue) -> Self {
        Self {
            draft: IssueDraft::from_issue(issue),
            editing: Some(id),
        }
    }

    pub fn edit_draft(id: i64, draft: IssueDraft) -> Self {
        Self {
            draft,
            editing: Some(id),
        }
    }

    pub fn draft(&self) -> &IssueDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut IssueDraft {
        &mut self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn reset(&mut self) {
        self.draft = IssueDraft::default();
        self.editing = None;
    }

    /// Submit the draft: update-by-id when editing, insert otherwise, then
    /// re-fetch the full list. On failure the draft stays populated for a
    /// retry.
    pub async fn submit(
        &mut self,
        catalog: &CatalogRepository,
    ) -> Result<SubmitOutcome, ComicError> {
        let payload = self.draft.build()?;
        let result = match self.editing {
            Some(id) => catalog.update(id, payload).await.map(|_| id),
            None => catalog.create(payload).await,
        };
        let id = result.inspect_err(|e| {
            error!(error = %e, editing = ?self.editing, "issue write failed; draft retained");
        })?;

        info!(id, editing = self.editing.is_some(), "issue written");
        self.reset();
        let refreshed = catalog.list(SortOrder::Newest).await;
        Ok(SubmitOutcome {
            id,
            catalog: refreshed,
        })
    }
}

/// Outcome of one file in an upload batch. Either `url` or `error` is set,
/// never both.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UploadOutcome {
    pub file_name: String,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl UploadOutcome {
    fn success(file_name: String, url: String) -> Self {
        Self {
            file_name,
            url: Some(url),
            error: None,
        }
    }

    fn failure(file_name: String, error: String) -> Self {
        Self {
            file_name,
            url: None,
            error: Some(error),
        }
    }
}

/// Upload every file concurrently and keep a per-file outcome. One failed
/// file does not discard the URLs the others produced.
pub async fn upload_batch(
    media: &MediaStore,
    bucket: &str,
    files: Vec<(String, Vec<u8>)>,
) -> Vec<UploadOutcome> {
    let uploads = files.into_iter().map(|(name, bytes)| async move {
        match media.store(bucket, &name, &bytes).await {
            Ok(url) => UploadOutcome::success(name, url),
            Err(e) => {
                error!(file = %name, error = %e, "upload failed");
                UploadOutcome::failure(name, e.to_string())
            }
        }
    });
    join_all(uploads).await
}
