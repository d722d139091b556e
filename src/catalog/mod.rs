//! Catalog accessor: every read the reader-facing pages need, plus the
//! admin write path. Reads degrade to empty results on store failure; the
//! UI renders "no results" / "not found", never a hard error.

pub mod seed;

use crate::db::models::{Issue, IssueSummary, NewIssue};
use crate::db::sqlite::CatalogStorage;
use crate::error::ComicError;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Rating,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total: i64,
    pub latest_id: Option<i64>,
    pub average_rating: f64,
}

#[derive(Clone)]
pub struct CatalogRepository {
    storage: CatalogStorage,
}

impl CatalogRepository {
    pub fn new(storage: CatalogStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &CatalogStorage {
        &self.storage
    }

    /// Full catalog in the requested order; empty on store failure.
    pub async fn list(&self, sort: SortOrder) -> Vec<Issue> {
        match self.storage.list(sort).await {
            Ok(issues) => issues,
            Err(e) => {
                error!(error = %e, "catalog list query failed");
                Vec::new()
            }
        }
    }

    /// Single issue; `None` both for absent ids and for store failures.
    pub async fn get(&self, id: i64) -> Option<Issue> {
        match self.storage.get_by_id(id).await {
            Ok(issue) => issue,
            Err(e) => {
                error!(id, error = %e, "issue lookup failed");
                None
            }
        }
    }

    /// Prev/next navigation links around `id`. Either side may be absent;
    /// an absent neighbor means no link is rendered.
    pub async fn adjacent(&self, id: i64) -> (Option<IssueSummary>, Option<IssueSummary>) {
        match self.storage.adjacent(id).await {
            Ok((prev, next)) => (
                prev.as_ref().map(IssueSummary::from),
                next.as_ref().map(IssueSummary::from),
            ),
            Err(e) => {
                error!(id, error = %e, "adjacent lookup failed");
                (None, None)
            }
        }
    }

    /// Text + tag search over the whole catalog, in the requested order.
    pub async fn search(&self, term: &str, tags: &[String], sort: SortOrder) -> Vec<Issue> {
        let all = self.list(sort).await;
        all.into_iter()
            .filter(|issue| matches_query(issue, term, tags))
            .collect()
    }

    /// Distinct tag vocabulary across the catalog, sorted.
    pub async fn tag_vocabulary(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .list(SortOrder::Oldest)
            .await
            .into_iter()
            .flat_map(|issue| issue.tags)
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// The issue featured on the home page: latest by release date.
    pub async fn featured(&self) -> Option<Issue> {
        self.list(SortOrder::Newest).await.into_iter().next()
    }

    pub async fn stats(&self) -> CatalogStats {
        let all = self.list(SortOrder::Oldest).await;
        let total = all.len() as i64;
        let latest_id = all.iter().map(|i| i.id).max();
        let average_rating = if all.is_empty() {
            0.0
        } else {
            all.iter().map(|i| i.rating).sum::<f64>() / all.len() as f64
        };
        CatalogStats {
            total,
            latest_id,
            average_rating,
        }
    }

    pub async fn create(&self, new: NewIssue) -> Result<i64, ComicError> {
        self.storage.insert(new).await
    }

    pub async fn update(&self, id: i64, new: NewIssue) -> Result<(), ComicError> {
        if self.storage.update_by_id(id, new).await? {
            Ok(())
        } else {
            Err(ComicError::IssueNotFound(id))
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), ComicError> {
        if self.storage.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(ComicError::IssueNotFound(id))
        }
    }
}

/// Search predicate: case-insensitive contains over title OR description
/// (empty term matches everything), AND the issue carries every requested
/// tag. AND across tags, not OR.
pub fn matches_query(issue: &Issue, term: &str, tags: &[String]) -> bool {
    let term = term.trim().to_lowercase();
    let matches_term = term.is_empty()
        || issue.title.to_lowercase().contains(&term)
        || issue.description.to_lowercase().contains(&term);

    let matches_tags = tags
        .iter()
        .all(|wanted| issue.tags.iter().any(|t| t == wanted));

    matches_term && matches_tags
}

/// Human-facing issue number: 1 + rank of `id` when the catalog is sorted
/// by release date ascending (oldest issue is #1). Ties break by id so the
/// numbering is total. Recomputed from the full set on every render.
pub fn issue_number(all: &[Issue], id: i64) -> Option<usize> {
    let mut ordered: Vec<(chrono::NaiveDate, i64)> =
        all.iter().map(|i| (i.release_date, i.id)).collect();
    ordered.sort();
    ordered
        .iter()
        .position(|&(_, issue_id)| issue_id == id)
        .map(|rank| rank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn issue(id: i64, title: &str, desc: &str, tags: &[&str], date: &str, rating: f64) -> Issue {
        Issue {
            id,
            title: title.to_string(),
            description: desc.to_string(),
            thumbnail: format!("/comics/issue{id}/thumbnail.jpg"),
            pages: vec![format!("/comics/issue{id}/page1.jpg")],
            tags: tags.iter().map(|t| t.to_string()).collect(),
            release_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            rating,
        }
    }

    fn sample() -> Vec<Issue> {
        vec![
            issue(1, "Origins", "where it began", &["drama"], "2024-01-01", 4.8),
            issue(
                2,
                "The First Smoke",
                "a chance encounter",
                &["mystery", "drama"],
                "2024-01-15",
                4.9,
            ),
            issue(
                3,
                "Smoke & Mirrors",
                "nothing is as it seems",
                &["thriller"],
                "2024-02-01",
                4.7,
            ),
        ]
    }

    #[test]
    fn empty_term_and_no_tags_match_everything() {
        let all = sample();
        let hits: Vec<_> = all
            .iter()
            .filter(|i| matches_query(i, "", &[]))
            .collect();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn term_match_is_case_insensitive_over_title_and_description() {
        let all = sample();
        assert!(matches_query(&all[0], "ORIGINS", &[]));
        assert!(matches_query(&all[1], "chance ENCOUNTER", &[]));
        assert!(!matches_query(&all[2], "origins", &[]));
    }

    #[test]
    fn tag_filter_requires_every_selected_tag() {
        let all = sample();
        let wanted = vec!["mystery".to_string()];
        let hits: Vec<i64> = all
            .iter()
            .filter(|i| matches_query(i, "", &wanted))
            .map(|i| i.id)
            .collect();
        assert_eq!(hits, vec![2]);

        // AND across tags: both must be present.
        let wanted = vec!["mystery".to_string(), "drama".to_string()];
        let hits: Vec<i64> = all
            .iter()
            .filter(|i| matches_query(i, "", &wanted))
            .map(|i| i.id)
            .collect();
        assert_eq!(hits, vec![2]);

        let wanted = vec!["mystery".to_string(), "thriller".to_string()];
        assert!(all.iter().all(|i| !matches_query(i, "", &wanted)));
    }

    #[test]
    fn issue_number_follows_release_date_ascending() {
        let all = sample();
        assert_eq!(issue_number(&all, 1), Some(1));
        assert_eq!(issue_number(&all, 2), Some(2));
        assert_eq!(issue_number(&all, 3), Some(3));
        assert_eq!(issue_number(&all, 99), None);
    }

    #[test]
    fn issue_number_is_stable_under_resorting() {
        let mut all = sample();
        all.reverse();
        // Earliest release date always yields #1, whatever the input order.
        assert_eq!(issue_number(&all, 1), Some(1));
        assert_eq!(issue_number(&all, 3), Some(3));
    }

    #[test]
    fn issue_number_breaks_date_ties_by_id() {
        let mut all = sample();
        all.push(issue(4, "Same Day", "tie", &[], "2024-01-01", 4.0));
        assert_eq!(issue_number(&all, 1), Some(1));
        assert_eq!(issue_number(&all, 4), Some(2));
    }
}
