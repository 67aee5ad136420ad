//! Route definitions for history article editing and rendering.
//!
//! Registered under `/articles`.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Article routes, registered as `/articles`.
///
/// ```text
/// GET    /               list_articles
/// POST   /               create_article
/// GET    /{id}           get_article
/// PUT    /{id}           update_article
/// DELETE /{id}           delete_article
/// GET    /{id}/rendered  get_rendered
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/{id}/rendered", get(articles::get_rendered))
}
