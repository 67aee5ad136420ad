use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chronica_cms::CmsError;
use chronica_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`CmsError`] for document
/// store failures, and implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `chronica-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document store error during a save, fetch, or delete.
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    /// An asset upload that was rejected or failed in transit.
    /// Recoverable: the operator retries or removes the image block.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Document store errors ---
            AppError::Cms(err) => classify_cms_error(err),

            // --- HTTP-specific errors ---
            AppError::UploadFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "UPLOAD_FAILED", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a CMS error into an HTTP status, error code, and message.
///
/// - A store-side 404 maps to 404.
/// - Everything else maps to 502 `PERSIST_FAILED`: the previously
///   persisted document is unchanged and the operator may retry.
fn classify_cms_error(err: &CmsError) -> (StatusCode, &'static str, String) {
    match err {
        CmsError::Api { status: 404, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Article not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Document store error");
            (
                StatusCode::BAD_GATEWAY,
                "PERSIST_FAILED",
                "The document store rejected the operation; retry the save".to_string(),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
