//! HTTP client for the headless CMS backing the association website.
//!
//! Wraps the document store (article CRUD) and the asset store (file
//! upload) behind typed methods. Both contracts are consumed as-is; no
//! retry or conflict resolution happens here -- a failed call is
//! reported to the operator, who retries.

pub mod assets;
pub mod client;

pub use assets::UploadedAsset;
pub use client::{ArticleRecord, CmsClient, CmsError};
