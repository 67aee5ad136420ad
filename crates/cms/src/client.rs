//! Document store client: article CRUD over the CMS REST API.
//!
//! The store speaks a Strapi-style envelope: requests wrap the document
//! in `{ "data": ... }` and responses come back as
//! `{ "data": { "id": ..., "attributes": { ... } } }`. Responses are
//! parsed leniently through [`ArticleDocument::from_json`], so content
//! written by other clients still loads.

use serde_json::Value;

use chronica_core::document::ArticleDocument;
use chronica_core::error::StoreId;

/// Path of the history article collection on the CMS.
const ARTICLES_PATH: &str = "/api/history-articles";

/// HTTP client for one CMS instance.
pub struct CmsClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// An article as returned by the document store.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    /// Store-assigned article id.
    pub id: StoreId,
    /// The persisted document.
    pub document: ArticleDocument,
}

/// Errors from the CMS HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The CMS returned a non-2xx status code.
    #[error("CMS API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The CMS returned 2xx but the body did not have the expected shape.
    #[error("Unexpected CMS response: {0}")]
    Unexpected(String),
}

impl CmsClient {
    /// Create a client for a CMS instance.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:1337`.
    /// * `token` - Optional API token sent as a bearer credential.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`] for
    /// connection pooling.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token,
        }
    }

    /// Persist a new article document. Returns the stored record with
    /// its assigned id.
    pub async fn create_article(
        &self,
        document: &ArticleDocument,
    ) -> Result<ArticleRecord, CmsError> {
        let response = self
            .request(reqwest::Method::POST, ARTICLES_PATH)
            .json(&serde_json::json!({ "data": document }))
            .send()
            .await?;

        Self::parse_record(response).await
    }

    /// Replace an article document wholesale. Last write wins; the store
    /// performs no version check.
    pub async fn update_article(
        &self,
        id: StoreId,
        document: &ArticleDocument,
    ) -> Result<ArticleRecord, CmsError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("{ARTICLES_PATH}/{id}"))
            .json(&serde_json::json!({ "data": document }))
            .send()
            .await?;

        Self::parse_record(response).await
    }

    /// Delete an article. Returns `false` when the store has no article
    /// with that id.
    pub async fn delete_article(&self, id: StoreId) -> Result<bool, CmsError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("{ARTICLES_PATH}/{id}"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::ensure_success(response).await?;
        Ok(true)
    }

    /// Fetch one article by id.
    pub async fn get_article(&self, id: StoreId) -> Result<ArticleRecord, CmsError> {
        let response = self
            .request(reqwest::Method::GET, &format!("{ARTICLES_PATH}/{id}"))
            .send()
            .await?;

        Self::parse_record(response).await
    }

    /// List all articles in the collection.
    pub async fn list_articles(&self) -> Result<Vec<ArticleRecord>, CmsError> {
        let response = self
            .request(reqwest::Method::GET, ARTICLES_PATH)
            .send()
            .await?;

        let body: Value = Self::ensure_success(response).await?.json().await?;
        let entries = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| CmsError::Unexpected("missing data array".into()))?;

        Ok(entries.iter().filter_map(Self::record_from_entry).collect())
    }

    // ---- internals ----

    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Ensure the response has a success status code, or capture the
    /// status and body as a [`CmsError::Api`].
    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CmsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CmsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a `{ "data": { "id", "attributes" } }` envelope into an
    /// [`ArticleRecord`].
    async fn parse_record(response: reqwest::Response) -> Result<ArticleRecord, CmsError> {
        let body: Value = Self::ensure_success(response).await?.json().await?;
        let entry = body
            .get("data")
            .ok_or_else(|| CmsError::Unexpected("missing data entry".into()))?;

        Self::record_from_entry(entry)
            .ok_or_else(|| CmsError::Unexpected("entry has no numeric id".into()))
    }

    fn record_from_entry(entry: &Value) -> Option<ArticleRecord> {
        let id = entry.get("id").and_then(Value::as_i64)?;
        let attributes = entry.get("attributes").unwrap_or(entry);
        Some(ArticleRecord {
            id,
            document: ArticleDocument::from_json(attributes),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
