//! Chronica content core.
//!
//! Pure in-memory domain logic for the association website's long-form
//! history articles: the content block model, the block editor state
//! machine, the codec between editor state and the stored document
//! format, and the renderer that turns stored documents into display
//! nodes for the public site.
//!
//! This crate has **zero I/O dependencies**. Persistence and asset
//! uploads go through the `chronica-cms` client crate; the HTTP surface
//! lives in `chronica-api`.

pub mod article;
pub mod block;
pub mod codec;
pub mod document;
pub mod editor;
pub mod error;
pub mod render;
