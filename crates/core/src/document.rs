//! Storage document wire shapes.
//!
//! These types are the exact JSON shapes exchanged with the document
//! store and read independently by the public site renderer, so serde
//! attributes here are load-bearing: field names and tag values must not
//! change without a content migration.
//!
//! An article document keeps its body text (`mainContent`, a generic
//! rich-text block tree) and its floating images (`contentImages`, a
//! list of placement records) as two separate arrays. Array order is the
//! only positional information; there is no index linking a placement to
//! a point in the text tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::ImagePosition;

// ---------------------------------------------------------------------------
// Rich-text block tree
// ---------------------------------------------------------------------------

/// Inline content of a rich-text node. Only plain text runs are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InlineNode {
    Text { text: String },
}

impl InlineNode {
    /// Single text run, the shape every block-level node's `children`
    /// array carries.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Child of a `list` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ListChild {
    ListItem { children: Vec<InlineNode> },
}

/// Ordering flag of a `list` node, stored as `"ordered"`/`"unordered"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    Ordered,
    Unordered,
}

/// One block-level node of the stored rich-text tree.
///
/// The `author` attribute on quotes is an extension of the generic tree:
/// older documents without it deserialize with `author: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RichTextNode {
    Heading {
        level: u8,
        children: Vec<InlineNode>,
    },
    Paragraph {
        children: Vec<InlineNode>,
    },
    Quote {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
        children: Vec<InlineNode>,
    },
    List {
        format: ListFormat,
        children: Vec<ListChild>,
    },
}

// ---------------------------------------------------------------------------
// Image placements
// ---------------------------------------------------------------------------

/// Layout record associating one uploaded asset with its float settings.
///
/// Stored in the article's `contentImages` array, separate from the text
/// tree. Every placement references a resolved asset id; unresolved
/// images never reach storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    /// Asset id in the document store.
    pub image: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt: String,
    pub position: ImagePosition,
    /// Percent of the text column, one of the editor's width presets.
    pub width: u8,
    pub show_caption: bool,
    pub rounded: bool,
    pub shadow: bool,
    pub pair_with_next: bool,
}

// ---------------------------------------------------------------------------
// Sidebar components
// ---------------------------------------------------------------------------

/// Typed aside widget rendered in the article's side column, never
/// interleaved with the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SidebarComponent {
    KeyFacts {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        facts: Vec<KeyFact>,
    },
    Timeline {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        entries: Vec<TimelineEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFact {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The content half of an article document: what the codec reads and
/// writes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDocument {
    #[serde(default)]
    pub main_content: Vec<RichTextNode>,
    #[serde(default)]
    pub content_images: Vec<ImagePlacement>,
}

impl StorageDocument {
    /// Lenient parse from raw store JSON.
    ///
    /// Unknown node types, malformed placements, and missing arrays are
    /// silently dropped rather than failing the whole document, so old
    /// or foreign content still opens in the editor.
    pub fn from_json(value: &Value) -> Self {
        Self {
            main_content: lenient_array(value.get("mainContent")),
            content_images: lenient_array(value.get("contentImages")),
        }
    }
}

/// A full article document as persisted in the store. Unrelated site
/// metadata (SEO fields, publication dates) stays on the store side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDocument {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub main_content: Vec<RichTextNode>,
    #[serde(default)]
    pub content_images: Vec<ImagePlacement>,
    #[serde(default)]
    pub sidebar_components: Vec<SidebarComponent>,
}

impl ArticleDocument {
    /// Lenient parse from raw store JSON, same policy as
    /// [`StorageDocument::from_json`].
    pub fn from_json(value: &Value) -> Self {
        let content = StorageDocument::from_json(value);
        Self {
            title: string_field(value, "title"),
            slug: string_field(value, "slug"),
            category: string_field(value, "category"),
            status: string_field(value, "status"),
            main_content: content.main_content,
            content_images: content.content_images,
            sidebar_components: lenient_array(value.get("sidebarComponents")),
        }
    }

    /// The content half of this document.
    pub fn content(&self) -> StorageDocument {
        StorageDocument {
            main_content: self.main_content.clone(),
            content_images: self.content_images.clone(),
        }
    }
}

/// Parse an optional JSON array element-by-element, dropping entries
/// that do not deserialize.
fn lenient_array<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
