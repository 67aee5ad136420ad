//! Handlers for history article CRUD and public rendering.
//!
//! The admin frontend sends the editor's block list together with the
//! article metadata; the handler validates, encodes the blocks into the
//! storage document format, and persists the whole document through the
//! CMS client. Reads go the other way: the stored document is decoded
//! back into blocks for the editor, or rendered into display nodes for
//! the public site.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use chronica_cms::ArticleRecord;
use chronica_core::article::{
    generate_slug, validate_category, validate_slug, validate_status, validate_title,
    DEFAULT_STATUS,
};
use chronica_core::block::{validate_block, Block};
use chronica_core::codec;
use chronica_core::document::{ArticleDocument, SidebarComponent};
use chronica_core::error::{CoreError, StoreId};
use chronica_core::render::{render, RenderedArticle};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// An article as submitted by the admin editor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    /// Omitted slugs are derived from the title.
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    /// Omitted statuses default to `draft`.
    #[serde(default)]
    pub status: Option<String>,
    /// The editor's ordered block list.
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub sidebar_components: Vec<SidebarComponent>,
}

/// An article re-opened for editing: metadata plus the decoded block
/// list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableArticle {
    pub id: StoreId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
    pub blocks: Vec<Block>,
    pub sidebar_components: Vec<SidebarComponent>,
}

/// Listing entry, without content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: StoreId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
}

/// Render payload for the public site.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedArticleResponse {
    pub id: StoreId,
    pub title: String,
    pub slug: String,
    pub category: String,
    #[serde(flatten)]
    pub rendered: RenderedArticle,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Validate a draft and encode it into a persistable document.
///
/// This is the save-time validation gate: metadata must be well-formed
/// and every block structurally valid before anything is sent to the
/// store.
fn draft_to_document(draft: ArticleDraft) -> AppResult<ArticleDocument> {
    validate_title(&draft.title).map_err(AppError::Core)?;
    validate_category(&draft.category).map_err(AppError::Core)?;

    let status = draft.status.unwrap_or_else(|| DEFAULT_STATUS.to_string());
    validate_status(&status).map_err(AppError::Core)?;

    let slug = match draft.slug {
        Some(slug) => slug,
        None => generate_slug(&draft.title),
    };
    validate_slug(&slug).map_err(AppError::Core)?;

    for block in &draft.blocks {
        validate_block(block).map_err(AppError::Core)?;
    }

    let content = codec::encode(&draft.blocks);

    Ok(ArticleDocument {
        title: draft.title,
        slug,
        category: draft.category,
        status,
        main_content: content.main_content,
        content_images: content.content_images,
        sidebar_components: draft.sidebar_components,
    })
}

/// Decode a stored record back into editor-facing shape.
fn editable_from_record(record: ArticleRecord) -> EditableArticle {
    let blocks = codec::decode(&record.document.content());
    EditableArticle {
        id: record.id,
        title: record.document.title,
        slug: record.document.slug,
        category: record.document.category,
        status: record.document.status,
        blocks,
        sidebar_components: record.document.sidebar_components,
    }
}

// ---------------------------------------------------------------------------
// Article CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/articles
///
/// List all articles (metadata only).
pub async fn list_articles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = state.cms.list_articles().await?;

    let summaries: Vec<ArticleSummary> = records
        .into_iter()
        .map(|record| ArticleSummary {
            id: record.id,
            title: record.document.title,
            slug: record.document.slug,
            category: record.document.category,
            status: record.document.status,
        })
        .collect();

    Ok(Json(DataResponse { data: summaries }))
}

/// POST /api/v1/articles
///
/// Validate and persist a new article.
pub async fn create_article(
    State(state): State<AppState>,
    Json(draft): Json<ArticleDraft>,
) -> AppResult<impl IntoResponse> {
    let document = draft_to_document(draft)?;
    let record = state.cms.create_article(&document).await?;

    tracing::info!(article_id = record.id, slug = %record.document.slug, "Article created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: editable_from_record(record),
        }),
    ))
}

/// GET /api/v1/articles/{id}
///
/// Fetch an article and decode it for editing.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> AppResult<impl IntoResponse> {
    let record = state.cms.get_article(id).await?;

    Ok(Json(DataResponse {
        data: editable_from_record(record),
    }))
}

/// PUT /api/v1/articles/{id}
///
/// Validate and replace an article wholesale. Last write wins; there is
/// no version check against the store.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Json(draft): Json<ArticleDraft>,
) -> AppResult<impl IntoResponse> {
    let document = draft_to_document(draft)?;
    let record = state.cms.update_article(id, &document).await?;

    tracing::info!(article_id = id, slug = %record.document.slug, "Article updated");

    Ok(Json(DataResponse {
        data: editable_from_record(record),
    }))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.cms.delete_article(id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }));
    }

    tracing::info!(article_id = id, "Article deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Public rendering
// ---------------------------------------------------------------------------

/// GET /api/v1/articles/{id}/rendered
///
/// Fetch an article and render it into display nodes for the public
/// site: body text in order, image placements with layout hints, and
/// sidebar components in their side channel.
pub async fn get_rendered(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> AppResult<impl IntoResponse> {
    let record = state.cms.get_article(id).await?;
    let rendered = render(&record.document);

    Ok(Json(DataResponse {
        data: RenderedArticleResponse {
            id: record.id,
            title: record.document.title,
            slug: record.document.slug,
            category: record.document.category,
            rendered,
        },
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
