pub mod articles;
pub mod assets;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /articles                 list, create (GET, POST)
/// /articles/{id}            get, update, delete
/// /articles/{id}/rendered   rendered article for the public site (GET)
///
/// /assets                   upload image asset (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // History article editing and rendering.
        .nest("/articles", articles::router())
        // Image asset uploads to the CMS media library.
        .nest("/assets", assets::router())
}
