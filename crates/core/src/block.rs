//! Content block model for article bodies.
//!
//! An article body is an ordered sequence of typed blocks (heading,
//! paragraph, quote, list, image). This module defines the block payload
//! shapes, their structural invariants, and the two predicates the editor
//! and codec rely on: [`validate_block`] and [`is_empty_block`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a block within one article. Assigned by the editor at
/// creation, unique within the article, never reused after deletion.
pub type BlockId = u64;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Heading levels the public layout supports (h1 is reserved for the title).
pub const VALID_HEADING_LEVELS: &[u8] = &[2, 3, 4];

/// Level assigned to a freshly inserted heading block.
pub const DEFAULT_HEADING_LEVEL: u8 = 3;

/// Width presets (percent of the text column) offered for floating images.
pub const VALID_IMAGE_WIDTHS: &[u8] = &[30, 40, 50, 60, 100];

/// Width assigned to a freshly inserted image block.
pub const DEFAULT_IMAGE_WIDTH: u8 = 50;

// ---------------------------------------------------------------------------
// Image layout enums
// ---------------------------------------------------------------------------

/// Where a floating image sits relative to the body text.
///
/// `Left` and `Right` float with text wrapping on the opposite side;
/// `Center` and `Full` are block-level with no wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Left,
    Right,
    Center,
    Full,
}

impl ImagePosition {
    /// Whether body text wraps around an image at this position.
    pub fn wraps_text(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Upload status of an image block's asset.
///
/// Kept on the block itself so upload progress stays scoped to the one
/// block it concerns. Never serialized: the stored document only ever
/// references resolved assets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Failed(String),
    Done,
}

// ---------------------------------------------------------------------------
// Block payloads
// ---------------------------------------------------------------------------

/// The closed set of block kinds, without payload data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Quote,
    List,
    Image,
}

impl BlockKind {
    /// Default payload for a freshly inserted block of this kind.
    ///
    /// Defaults are always structurally valid, so inserting a block can
    /// never fail validation.
    pub fn default_payload(self) -> BlockPayload {
        match self {
            Self::Heading => BlockPayload::Heading {
                text: String::new(),
                level: DEFAULT_HEADING_LEVEL,
            },
            Self::Paragraph => BlockPayload::Paragraph {
                text: String::new(),
            },
            Self::Quote => BlockPayload::Quote {
                text: String::new(),
                author: None,
            },
            Self::List => BlockPayload::List {
                items: Vec::new(),
                ordered: false,
            },
            Self::Image => BlockPayload::Image(ImageBlock::default()),
        }
    }
}

/// Kind-dependent payload of a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockPayload {
    Heading {
        text: String,
        level: u8,
    },
    Paragraph {
        text: String,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    List {
        items: Vec<String>,
        ordered: bool,
    },
    Image(ImageBlock),
}

/// Payload of an image block: the (possibly not yet resolved) asset plus
/// its layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Document-store id of the uploaded asset, once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<i64>,
    /// Public URL of the uploaded asset, once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub position: ImagePosition,
    pub width_percent: u8,
    #[serde(default)]
    pub show_caption: bool,
    #[serde(default)]
    pub rounded: bool,
    #[serde(default)]
    pub shadow: bool,
    /// Pair this image with the next one into a shared row.
    #[serde(default)]
    pub pair_with_next: bool,
    /// Transient upload status, editor-session only.
    #[serde(skip)]
    pub upload: UploadState,
}

impl Default for ImageBlock {
    fn default() -> Self {
        Self {
            asset_id: None,
            asset_url: None,
            alt: String::new(),
            caption: None,
            position: ImagePosition::Center,
            width_percent: DEFAULT_IMAGE_WIDTH,
            show_caption: true,
            rounded: false,
            shadow: false,
            pair_with_next: false,
            upload: UploadState::Idle,
        }
    }
}

/// One unit of article body content: a stable id plus a typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub payload: BlockPayload,
}

impl Block {
    /// The kind discriminant of this block's payload.
    pub fn kind(&self) -> BlockKind {
        match self.payload {
            BlockPayload::Heading { .. } => BlockKind::Heading,
            BlockPayload::Paragraph { .. } => BlockKind::Paragraph,
            BlockPayload::Quote { .. } => BlockKind::Quote,
            BlockPayload::List { .. } => BlockKind::List,
            BlockPayload::Image(_) => BlockKind::Image,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Validate a block's structural invariants.
///
/// - Heading level must be one of [`VALID_HEADING_LEVELS`].
/// - Image width must be one of [`VALID_IMAGE_WIDTHS`].
/// - A full-bleed image must have width 100.
pub fn validate_block(block: &Block) -> Result<(), CoreError> {
    match &block.payload {
        BlockPayload::Heading { level, .. } => validate_heading_level(*level),
        BlockPayload::Paragraph { .. } | BlockPayload::Quote { .. } => Ok(()),
        BlockPayload::List { .. } => Ok(()),
        BlockPayload::Image(image) => {
            validate_image_width(image.width_percent)?;
            if image.position == ImagePosition::Full && image.width_percent != 100 {
                return Err(CoreError::Validation(format!(
                    "Full-width images must have width 100, got {}",
                    image.width_percent
                )));
            }
            Ok(())
        }
    }
}

/// Validate a heading level against the supported set.
pub fn validate_heading_level(level: u8) -> Result<(), CoreError> {
    if VALID_HEADING_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid heading level {level}. Must be one of: 2, 3, 4"
        )))
    }
}

/// Validate an image width against the preset set.
pub fn validate_image_width(width: u8) -> Result<(), CoreError> {
    if VALID_IMAGE_WIDTHS.contains(&width) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image width {width}. Must be one of: 30, 40, 50, 60, 100"
        )))
    }
}

/// Whether a block carries no usable content.
///
/// Empty blocks are permitted while editing but are dropped when the
/// article is serialized for storage:
/// - heading/paragraph/quote with blank text after trimming,
/// - list with no non-blank item,
/// - image without a resolved asset.
pub fn is_empty_block(block: &Block) -> bool {
    match &block.payload {
        BlockPayload::Heading { text, .. }
        | BlockPayload::Paragraph { text }
        | BlockPayload::Quote { text, .. } => text.trim().is_empty(),
        BlockPayload::List { items, .. } => items.iter().all(|i| i.trim().is_empty()),
        BlockPayload::Image(image) => image.asset_id.is_none(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn block(payload: BlockPayload) -> Block {
        Block { id: 1, payload }
    }

    // -- default payloads ----------------------------------------------------

    #[test]
    fn default_payloads_are_valid() {
        for kind in [
            BlockKind::Heading,
            BlockKind::Paragraph,
            BlockKind::Quote,
            BlockKind::List,
            BlockKind::Image,
        ] {
            let b = block(kind.default_payload());
            assert!(validate_block(&b).is_ok(), "{kind:?} default must be valid");
            assert_eq!(b.kind(), kind);
        }
    }

    #[test]
    fn default_heading_level_is_three() {
        match BlockKind::Heading.default_payload() {
            BlockPayload::Heading { level, .. } => assert_eq!(level, DEFAULT_HEADING_LEVEL),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    // -- validate_block ------------------------------------------------------

    #[test]
    fn rejects_heading_level_outside_set() {
        for level in [0, 1, 5, 7] {
            let b = block(BlockPayload::Heading {
                text: "Title".into(),
                level,
            });
            assert!(validate_block(&b).is_err(), "level {level} must be rejected");
        }
    }

    #[test]
    fn rejects_image_width_outside_presets() {
        let mut image = ImageBlock::default();
        image.width_percent = 45;
        assert!(validate_block(&block(BlockPayload::Image(image))).is_err());
    }

    #[test]
    fn rejects_full_position_with_partial_width() {
        let mut image = ImageBlock::default();
        image.position = ImagePosition::Full;
        image.width_percent = 60;
        assert!(validate_block(&block(BlockPayload::Image(image))).is_err());
    }

    #[test]
    fn accepts_full_position_with_full_width() {
        let mut image = ImageBlock::default();
        image.position = ImagePosition::Full;
        image.width_percent = 100;
        assert!(validate_block(&block(BlockPayload::Image(image))).is_ok());
    }

    // -- is_empty_block ------------------------------------------------------

    #[test]
    fn blank_text_blocks_are_empty() {
        assert!(is_empty_block(&block(BlockPayload::Paragraph {
            text: "   ".into()
        })));
        assert!(is_empty_block(&block(BlockPayload::Heading {
            text: "".into(),
            level: 2
        })));
        assert!(is_empty_block(&block(BlockPayload::Quote {
            text: "\n".into(),
            author: Some("Someone".into())
        })));
    }

    #[test]
    fn non_blank_text_blocks_are_not_empty() {
        assert!(!is_empty_block(&block(BlockPayload::Paragraph {
            text: "hello".into()
        })));
    }

    #[test]
    fn list_with_only_blank_items_is_empty() {
        assert!(is_empty_block(&block(BlockPayload::List {
            items: vec!["".into(), "  ".into()],
            ordered: false
        })));
        assert!(!is_empty_block(&block(BlockPayload::List {
            items: vec!["".into(), "musket drill".into()],
            ordered: true
        })));
    }

    #[test]
    fn image_without_asset_is_empty() {
        assert!(is_empty_block(&block(BlockPayload::Image(
            ImageBlock::default()
        ))));

        let mut image = ImageBlock::default();
        image.asset_id = Some(42);
        assert!(!is_empty_block(&block(BlockPayload::Image(image))));
    }

    #[test]
    fn wraps_text_only_for_floats() {
        assert!(ImagePosition::Left.wraps_text());
        assert!(ImagePosition::Right.wraps_text());
        assert!(!ImagePosition::Center.wraps_text());
        assert!(!ImagePosition::Full.wraps_text());
    }

    // -- wire shape ----------------------------------------------------------

    #[test]
    fn block_serializes_with_flattened_kind_tag() {
        let b = block(BlockPayload::Heading {
            text: "The 1809 campaign".into(),
            level: 2,
        });
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["text"], "The 1809 campaign");
    }

    #[test]
    fn upload_state_never_serialized() {
        let mut image = ImageBlock::default();
        image.asset_id = Some(7);
        image.upload = UploadState::Failed("timeout".into());
        let json = serde_json::to_value(&block(BlockPayload::Image(image))).unwrap();
        assert!(json.get("upload").is_none());
    }
}
