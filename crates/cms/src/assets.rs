//! Asset store client: file upload over the CMS upload endpoint.

use serde::{Deserialize, Serialize};

use crate::client::{CmsClient, CmsError};

/// Path of the upload endpoint on the CMS.
const UPLOAD_PATH: &str = "/api/upload";

/// A successfully uploaded asset, as needed to resolve an image block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// Store-assigned asset id, referenced by image placements.
    #[serde(rename = "id")]
    pub asset_id: i64,
    /// Public URL of the uploaded file.
    pub url: String,
}

impl CmsClient {
    /// Upload one file to the asset store.
    ///
    /// Sends a multipart POST with a single `files` part. The store
    /// responds with an array of uploaded entries; exactly one is
    /// expected here. Failures are recoverable from the editor's point
    /// of view: the image block keeps its unresolved state and the
    /// operator retries.
    pub async fn upload_asset(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedAsset, CmsError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self
            .request(reqwest::Method::POST, UPLOAD_PATH)
            .multipart(form)
            .send()
            .await?;

        let entries: Vec<UploadedAsset> = Self::ensure_success(response).await?.json().await?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::Unexpected("empty upload response".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
