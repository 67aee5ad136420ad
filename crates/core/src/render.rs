//! Renderer from stored documents to display nodes.
//!
//! A stateless, single-pass walk: one display node per rich-text node,
//! image placements passed through with their layout hints, and sidebar
//! components emitted on a separate side channel. The presentation layer
//! turns display nodes into markup and computes the actual float/wrap
//! geometry from the placement data; no CSS concern lives here.

use serde::Serialize;

use crate::codec::inline_text;
use crate::document::{
    ArticleDocument, ImagePlacement, ListChild, ListFormat, RichTextNode, SidebarComponent,
};

/// One renderable unit of article body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DisplayNode {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Quote {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
}

/// Complete render output for one article.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedArticle {
    /// Body text nodes, in document order.
    pub body: Vec<DisplayNode>,
    /// Floating image placements, in document order. `left`/`right`
    /// positions float with text wrap; `center`/`full` are block-level.
    pub images: Vec<ImagePlacement>,
    /// Aside widgets for the side column, never interleaved with the body.
    pub aside: Vec<SidebarComponent>,
}

/// Render a persisted article into display nodes.
pub fn render(document: &ArticleDocument) -> RenderedArticle {
    RenderedArticle {
        body: render_body(&document.main_content),
        images: document.content_images.clone(),
        aside: document.sidebar_components.clone(),
    }
}

/// Render a rich-text tree into body display nodes.
pub fn render_body(nodes: &[RichTextNode]) -> Vec<DisplayNode> {
    nodes.iter().map(render_node).collect()
}

fn render_node(node: &RichTextNode) -> DisplayNode {
    match node {
        RichTextNode::Heading { level, children } => DisplayNode::Heading {
            level: *level,
            text: inline_text(children),
        },
        RichTextNode::Paragraph { children } => DisplayNode::Paragraph {
            text: inline_text(children),
        },
        RichTextNode::Quote { author, children } => DisplayNode::Quote {
            text: inline_text(children),
            author: author.clone(),
        },
        RichTextNode::List { format, children } => DisplayNode::List {
            ordered: *format == ListFormat::Ordered,
            items: children
                .iter()
                .map(|ListChild::ListItem { children }| inline_text(children))
                .collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
