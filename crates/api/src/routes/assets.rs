//! Route definitions for image asset uploads.
//!
//! Registered under `/assets`.

use axum::routing::post;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes, registered as `/assets`.
///
/// ```text
/// POST /  upload_asset (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(assets::upload_asset))
}
