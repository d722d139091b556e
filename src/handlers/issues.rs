use crate::catalog::{self, CatalogStats, SortOrder};
use crate::dashboard::{FormController, IssueDraft, SubmitOutcome};
use crate::db::models::{Issue, IssueSummary, NewIssue};
use crate::error::ComicError;
use crate::middleware::AdminSession;
use crate::router::AppState;
use crate::viewer::ViewerBootstrap;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Comma-separated tag list; every tag must match.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct IssueDetail {
    pub issue: Issue,
    /// Human-facing issue number: oldest release date is #1. Recomputed
    /// from the full catalog on every request, never stored.
    pub number: Option<usize>,
    pub prev: Option<IssueSummary>,
    pub next: Option<IssueSummary>,
    pub viewer: ViewerBootstrap,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: Vec<Issue>,
}

/// GET /api/issues?sort=newest|oldest|rating
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Issue>> {
    Json(state.catalog.list(query.sort).await)
}

/// GET /api/issues/{id} -> the issue plus everything its page renders:
/// issue number, prev/next links, viewer bootstrap.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<IssueDetail>, ComicError> {
    let issue = state
        .catalog
        .get(id)
        .await
        .ok_or(ComicError::IssueNotFound(id))?;

    let all = state.catalog.list(SortOrder::Oldest).await;
    let number = catalog::issue_number(&all, id);
    let (prev, next) = state.catalog.adjacent(id).await;
    let viewer = ViewerBootstrap::for_pages(issue.pages.len());

    Ok(Json(IssueDetail {
        issue,
        number,
        prev,
        next,
        viewer,
    }))
}

/// GET /api/issues/featured -> the issue the home page features: latest by
/// release date. 404 while the catalog is empty.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Issue>, ComicError> {
    state
        .catalog
        .featured()
        .await
        .map(Json)
        .ok_or(ComicError::IssueNotFound(0))
}

/// GET /api/search?q=&tags=a,b&sort=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let tags: Vec<String> = query
        .tags
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let results = state.catalog.search(&query.q, &tags, query.sort).await;
    Json(SearchResponse {
        count: results.len(),
        results,
    })
}

/// GET /api/tags -> distinct tag vocabulary for the search filter UI.
pub async fn tags(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.tag_vocabulary().await)
}

/// GET /api/stats -> dashboard overview numbers.
pub async fn stats(_session: AdminSession, State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog.stats().await)
}

/// POST /api/issues -> insert, then re-fetch the catalog.
pub async fn create(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<NewIssue>,
) -> Result<(StatusCode, Json<SubmitOutcome>), ComicError> {
    let mut form = FormController::create(IssueDraft::from_new(payload));
    let outcome = form.submit(&state.catalog).await?;
    info!(id = outcome.id, "issue created");
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// PUT /api/issues/{id} -> full-replace update, then re-fetch the catalog.
pub async fn update(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewIssue>,
) -> Result<Json<SubmitOutcome>, ComicError> {
    let mut form = FormController::edit_draft(id, IssueDraft::from_new(payload));
    let outcome = form.submit(&state.catalog).await?;
    info!(id, "issue updated");
    Ok(Json(outcome))
}

/// DELETE /api/issues/{id}. Deletion is explicit and confirmed client-side;
/// there is no soft delete.
pub async fn delete(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ComicError> {
    state.catalog.delete(id).await?;
    info!(id, "issue deleted");
    Ok(StatusCode::NO_CONTENT)
}
