use crate::dashboard::{UploadOutcome, upload_batch};
use crate::error::ComicError;
use crate::middleware::AdminSession;
use crate::router::AppState;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

const UPLOAD_BUCKET: &str = "issues";

/// POST /api/uploads -> store every multipart file and report a per-file
/// outcome. A failed file never discards the URLs the others produced.
pub async fn upload(
    _session: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadOutcome>>, ComicError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "file".to_string());
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            continue;
        }
        files.push((name, bytes.to_vec()));
    }
    if files.is_empty() {
        return Err(ComicError::UploadRejected("no files in request".into()));
    }

    info!(count = files.len(), "upload batch received");
    let outcomes = upload_batch(&state.media, UPLOAD_BUCKET, files).await;
    Ok(Json(outcomes))
}

/// GET /media/{*path} -> raw bytes from the media bucket.
pub async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ComicError> {
    let (bytes, content_type) = state.media.read(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
