//! Handler for image asset uploads.
//!
//! The editor uploads the image file before the article is saved; the
//! block keeps only the returned asset id. The upload is forwarded to
//! the CMS media library as-is, so a failed transfer never touches the
//! article document.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const FALLBACK_FILE_NAME: &str = "upload.bin";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /api/v1/assets
///
/// Accept a multipart upload with a single file field and forward it to
/// the CMS media library. Returns the stored asset's id and URL.
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {e}")))?
        .ok_or_else(|| AppError::BadRequest("Expected a file field".to_string()))?;

    let file_name = field
        .file_name()
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string();
    let content_type = field
        .content_type()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload body: {e}")))?;

    let asset = state
        .cms
        .upload_asset(&file_name, &content_type, bytes.to_vec())
        .await
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    tracing::info!(asset_id = asset.asset_id, file = %file_name, "Asset uploaded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}
