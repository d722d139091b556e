use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ComicError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("issue {0} not found")]
    IssueNotFound(i64),

    #[error("media object not found")]
    MediaNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("not authenticated")]
    Unauthenticated,

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("invalid issue data: {0}")]
    InvalidDraft(String),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl From<argon2::password_hash::Error> for ComicError {
    fn from(e: argon2::password_hash::Error) -> Self {
        ComicError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for ComicError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            ComicError::IssueNotFound(_) | ComicError::MediaNotFound => {
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "This issue doesn't exist yet!".to_string(),
                };
                (StatusCode::NOT_FOUND, body)
            }
            ComicError::InvalidCredentials => {
                // Same message no matter which field was wrong.
                let body = ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid credentials".to_string(),
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            ComicError::Unauthenticated => {
                let body = ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Not authenticated.".to_string(),
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            ComicError::InvalidDraft(msg) => {
                let body = ApiErrorBody {
                    code: "INVALID_ISSUE".to_string(),
                    message: msg,
                };
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            ComicError::UploadRejected(msg) => {
                let body = ApiErrorBody {
                    code: "UPLOAD_REJECTED".to_string(),
                    message: msg,
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ComicError::Multipart(e) => {
                let body = ApiErrorBody {
                    code: "BAD_MULTIPART".to_string(),
                    message: e.to_string(),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ComicError::Database(_)
            | ComicError::Json(_)
            | ComicError::Io(_)
            | ComicError::PasswordHash(_) => {
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
