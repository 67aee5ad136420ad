//! Block editor state machine.
//!
//! Owns the live, mutable block sequence of one article during an
//! editing session. Mutations are last-write-wins with no operation
//! history; the sequence is always ready to serialize, so there is no
//! separate commit step before persisting.
//!
//! Structural operations are deliberately forgiving: an unknown block id
//! is a silent no-op rather than an error, mirroring an authoring tool
//! where a stale button click should never break the session. The only
//! genuinely fallible operation is the asset upload, which lives outside
//! this crate; the editor just tracks its per-block status.

use crate::block::{
    validate_heading_level, validate_image_width, Block, BlockId, BlockKind, BlockPayload,
    ImagePosition, UploadState,
};
use crate::codec;
use crate::document::StorageDocument;
use crate::error::CoreError;

/// Direction of a single-step block move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Partial payload update for [`ArticleEditor::update_block`].
///
/// `None` fields are left untouched. A patch whose variant does not
/// match the target block's kind is ignored; updates never change a
/// block's kind.
#[derive(Debug, Clone, Default)]
pub struct BlockPatch {
    pub text: Option<String>,
    pub level: Option<u8>,
    pub author: Option<String>,
    pub items: Option<Vec<String>>,
    pub ordered: Option<bool>,
}

/// Partial image configuration for [`ArticleEditor::configure_image`].
#[derive(Debug, Clone, Default)]
pub struct ImageSettings {
    pub position: Option<ImagePosition>,
    pub width_percent: Option<u8>,
    pub show_caption: Option<bool>,
    pub rounded: Option<bool>,
    pub shadow: Option<bool>,
    pub pair_with_next: Option<bool>,
    pub caption: Option<String>,
    pub alt: Option<String>,
}

/// Editing state for one article body.
///
/// Invariants, maintained by every operation:
/// - the block sequence is never empty,
/// - block ids are unique and never reused after deletion.
#[derive(Debug, Clone)]
pub struct ArticleEditor {
    blocks: Vec<Block>,
    next_id: BlockId,
}

impl Default for ArticleEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleEditor {
    /// Fresh editor seeded with a single empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block {
                id: 1,
                payload: BlockKind::Paragraph.default_payload(),
            }],
            next_id: 2,
        }
    }

    /// Re-open a stored document for editing.
    pub fn from_document(document: &StorageDocument) -> Self {
        let blocks = codec::decode(document);
        let next_id = blocks.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self { blocks, next_id }
    }

    /// The current ordered block sequence.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Serialize the current state into the storage document format.
    pub fn to_document(&self) -> StorageDocument {
        codec::encode(&self.blocks)
    }

    // -- structural operations ----------------------------------------------

    /// Insert a new block with the kind's default payload.
    ///
    /// The block lands immediately after `after`, or at the end when
    /// `after` is `None` or unknown. Always succeeds; defaults are
    /// always valid.
    pub fn insert_block(&mut self, kind: BlockKind, after: Option<BlockId>) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;

        let block = Block {
            id,
            payload: kind.default_payload(),
        };

        match after.and_then(|a| self.index_of(a)) {
            Some(index) => self.blocks.insert(index + 1, block),
            None => self.blocks.push(block),
        }

        id
    }

    /// Merge a partial payload into the block with the given id.
    ///
    /// Unknown ids and kind-mismatched fields are silent no-ops. An
    /// invalid heading level is rejected and the edit is not applied.
    pub fn update_block(&mut self, id: BlockId, patch: BlockPatch) -> Result<(), CoreError> {
        if let Some(level) = patch.level {
            validate_heading_level(level)?;
        }

        let Some(block) = self.block_mut(id) else {
            return Ok(());
        };

        match &mut block.payload {
            BlockPayload::Heading { text, level } => {
                if let Some(new_text) = patch.text {
                    *text = new_text;
                }
                if let Some(new_level) = patch.level {
                    *level = new_level;
                }
            }
            BlockPayload::Paragraph { text } => {
                if let Some(new_text) = patch.text {
                    *text = new_text;
                }
            }
            BlockPayload::Quote { text, author } => {
                if let Some(new_text) = patch.text {
                    *text = new_text;
                }
                if let Some(new_author) = patch.author {
                    *author = if new_author.trim().is_empty() {
                        None
                    } else {
                        Some(new_author)
                    };
                }
            }
            BlockPayload::List { items, ordered } => {
                if let Some(new_items) = patch.items {
                    *items = new_items;
                }
                if let Some(new_ordered) = patch.ordered {
                    *ordered = new_ordered;
                }
            }
            // Image blocks are updated through configure_image and the
            // upload operations.
            BlockPayload::Image(_) => {}
        }

        Ok(())
    }

    /// Delete the block with the given id.
    ///
    /// Refuses when it is the last remaining block: the sequence must
    /// never become empty. Returns whether a block was removed.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        if self.blocks.len() <= 1 {
            return false;
        }
        match self.index_of(id) {
            Some(index) => {
                self.blocks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Swap the block with its immediate neighbor in the given
    /// direction. No-op at either boundary or on unknown ids. Returns
    /// whether a swap happened.
    pub fn move_block(&mut self, id: BlockId, direction: Direction) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        match direction {
            Direction::Up if index > 0 => {
                self.blocks.swap(index, index - 1);
                true
            }
            Direction::Down if index + 1 < self.blocks.len() => {
                self.blocks.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    // -- image operations -----------------------------------------------------

    /// Mark an image block's upload as in flight.
    pub fn begin_upload(&mut self, id: BlockId) {
        if let Some(image) = self.image_mut(id) {
            image.upload = UploadState::Uploading;
        }
    }

    /// Record a successful upload: the block now references a resolved
    /// asset and becomes eligible for serialization.
    pub fn finish_upload(&mut self, id: BlockId, asset_id: i64, url: String) {
        if let Some(image) = self.image_mut(id) {
            image.asset_id = Some(asset_id);
            image.asset_url = Some(url);
            image.upload = UploadState::Done;
        }
    }

    /// Record a failed upload. The asset fields stay unset; the operator
    /// can retry or remove the block, and other blocks are unaffected.
    pub fn fail_upload(&mut self, id: BlockId, reason: String) {
        if let Some(image) = self.image_mut(id) {
            image.upload = UploadState::Failed(reason);
        }
    }

    /// Apply layout settings to an image block.
    ///
    /// A `full` position forces width 100; any other explicit width must
    /// be one of the presets. Unknown ids and non-image blocks are
    /// silent no-ops.
    pub fn configure_image(
        &mut self,
        id: BlockId,
        settings: ImageSettings,
    ) -> Result<(), CoreError> {
        let Some(image) = self.image_mut(id) else {
            return Ok(());
        };

        let position = settings.position.unwrap_or(image.position);
        let width = if position == ImagePosition::Full {
            100
        } else {
            settings.width_percent.unwrap_or(image.width_percent)
        };
        validate_image_width(width)?;

        image.position = position;
        image.width_percent = width;
        if let Some(show_caption) = settings.show_caption {
            image.show_caption = show_caption;
        }
        if let Some(rounded) = settings.rounded {
            image.rounded = rounded;
        }
        if let Some(shadow) = settings.shadow {
            image.shadow = shadow;
        }
        if let Some(pair_with_next) = settings.pair_with_next {
            image.pair_with_next = pair_with_next;
        }
        if let Some(caption) = settings.caption {
            image.caption = if caption.trim().is_empty() {
                None
            } else {
                Some(caption)
            };
        }
        if let Some(alt) = settings.alt {
            image.alt = alt;
        }

        Ok(())
    }

    // -- private helpers ------------------------------------------------------

    fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    fn image_mut(&mut self, id: BlockId) -> Option<&mut crate::block::ImageBlock> {
        match self.block_mut(id).map(|b| &mut b.payload) {
            Some(BlockPayload::Image(image)) => Some(image),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn text_patch(text: &str) -> BlockPatch {
        BlockPatch {
            text: Some(text.to_string()),
            ..BlockPatch::default()
        }
    }

    // -- invariants ----------------------------------------------------------

    #[test]
    fn new_editor_has_one_empty_paragraph() {
        let editor = ArticleEditor::new();
        assert_eq!(editor.blocks().len(), 1);
        assert_eq!(
            editor.blocks()[0].payload,
            BlockPayload::Paragraph {
                text: String::new()
            }
        );
    }

    #[test]
    fn ids_stay_unique_after_churn() {
        let mut editor = ArticleEditor::new();
        let a = editor.insert_block(BlockKind::Heading, None);
        let b = editor.insert_block(BlockKind::Quote, Some(a));
        editor.remove_block(a);
        let c = editor.insert_block(BlockKind::List, None);

        let mut ids: Vec<BlockId> = editor.blocks().iter().map(|blk| blk.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), editor.blocks().len());
        // Ids are never reused, even after deletion.
        assert!(c > b);
        assert!(!editor.blocks().iter().any(|blk| blk.id == a));
    }

    // -- insert_block --------------------------------------------------------

    #[test]
    fn insert_heading_into_default_editor() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Heading, None);

        assert_eq!(editor.blocks().len(), 2);
        let inserted = &editor.blocks()[1];
        assert_eq!(inserted.id, id);
        assert_eq!(
            inserted.payload,
            BlockPayload::Heading {
                text: String::new(),
                level: 3,
            }
        );
    }

    #[test]
    fn insert_after_places_block_immediately_after_anchor() {
        let mut editor = ArticleEditor::new();
        let first = editor.blocks()[0].id;
        let tail = editor.insert_block(BlockKind::Paragraph, None);
        let middle = editor.insert_block(BlockKind::Quote, Some(first));

        let ids: Vec<BlockId> = editor.blocks().iter().map(|blk| blk.id).collect();
        assert_eq!(ids, vec![first, middle, tail]);
    }

    #[test]
    fn insert_after_unknown_id_appends() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::List, Some(999));
        assert_eq!(editor.blocks().last().unwrap().id, id);
    }

    // -- update_block --------------------------------------------------------

    #[test]
    fn update_merges_partial_payload() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Heading, None);
        editor.update_block(id, text_patch("Wagram")).unwrap();
        editor
            .update_block(
                id,
                BlockPatch {
                    level: Some(2),
                    ..BlockPatch::default()
                },
            )
            .unwrap();

        assert_eq!(
            editor.blocks()[1].payload,
            BlockPayload::Heading {
                text: "Wagram".into(),
                level: 2,
            }
        );
    }

    #[test]
    fn update_unknown_id_is_silent_noop() {
        let mut editor = ArticleEditor::new();
        let before = editor.blocks().to_vec();
        assert!(editor.update_block(404, text_patch("ghost")).is_ok());
        assert_eq!(editor.blocks(), &before[..]);
    }

    #[test]
    fn update_rejects_invalid_heading_level_without_applying() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Heading, None);
        let result = editor.update_block(
            id,
            BlockPatch {
                text: Some("should not land".into()),
                level: Some(7),
                ..BlockPatch::default()
            },
        );

        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(
            editor.blocks()[1].payload,
            BlockPayload::Heading {
                text: String::new(),
                level: 3,
            }
        );
    }

    #[test]
    fn update_never_changes_kind() {
        let mut editor = ArticleEditor::new();
        let id = editor.blocks()[0].id;
        // level only applies to headings; the paragraph ignores it.
        editor
            .update_block(
                id,
                BlockPatch {
                    text: Some("still a paragraph".into()),
                    ordered: Some(true),
                    ..BlockPatch::default()
                },
            )
            .unwrap();

        assert_eq!(editor.blocks()[0].kind(), BlockKind::Paragraph);
    }

    #[test]
    fn update_clears_blank_quote_author() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Quote, None);
        editor
            .update_block(
                id,
                BlockPatch {
                    author: Some("Cambronne".into()),
                    ..BlockPatch::default()
                },
            )
            .unwrap();
        editor
            .update_block(
                id,
                BlockPatch {
                    author: Some("  ".into()),
                    ..BlockPatch::default()
                },
            )
            .unwrap();

        assert_matches!(
            &editor.blocks()[1].payload,
            BlockPayload::Quote { author: None, .. }
        );
    }

    // -- remove_block --------------------------------------------------------

    #[test]
    fn remove_refuses_on_singleton_sequence() {
        let mut editor = ArticleEditor::new();
        let id = editor.blocks()[0].id;
        assert!(!editor.remove_block(id));
        assert_eq!(editor.blocks().len(), 1);
    }

    #[test]
    fn remove_deletes_block() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Quote, None);
        assert!(editor.remove_block(id));
        assert_eq!(editor.blocks().len(), 1);
    }

    // -- move_block ----------------------------------------------------------

    #[test]
    fn move_up_at_top_is_noop_and_down_swaps() {
        let mut editor = ArticleEditor::new();
        let first = editor.blocks()[0].id;
        let second = editor.insert_block(BlockKind::Heading, None);
        editor.insert_block(BlockKind::Quote, None);

        assert!(!editor.move_block(first, Direction::Up));
        assert!(editor.move_block(first, Direction::Down));

        let ids: Vec<BlockId> = editor.blocks().iter().map(|blk| blk.id).collect();
        assert_eq!(ids[0], second);
        assert_eq!(ids[1], first);
    }

    #[test]
    fn move_down_at_bottom_is_noop() {
        let mut editor = ArticleEditor::new();
        let last = editor.insert_block(BlockKind::Heading, None);
        assert!(!editor.move_block(last, Direction::Down));
    }

    // -- image operations ----------------------------------------------------

    #[test]
    fn upload_lifecycle_transitions() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Image, None);

        editor.begin_upload(id);
        assert_matches!(image_state(&editor, id), UploadState::Uploading);

        editor.fail_upload(id, "connection reset".into());
        assert_matches!(image_state(&editor, id), UploadState::Failed(_));

        // Retry succeeds.
        editor.begin_upload(id);
        editor.finish_upload(id, 31, "https://cms.example/uploads/31.jpg".into());
        assert_matches!(image_state(&editor, id), UploadState::Done);

        match &editor.blocks().last().unwrap().payload {
            BlockPayload::Image(image) => {
                assert_eq!(image.asset_id, Some(31));
                assert_eq!(
                    image.asset_url.as_deref(),
                    Some("https://cms.example/uploads/31.jpg")
                );
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn failed_upload_leaves_asset_unset() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Image, None);
        editor.begin_upload(id);
        editor.fail_upload(id, "413 payload too large".into());

        match &editor.blocks().last().unwrap().payload {
            BlockPayload::Image(image) => assert_eq!(image.asset_id, None),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn configure_full_position_forces_full_width() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Image, None);
        editor
            .configure_image(
                id,
                ImageSettings {
                    position: Some(ImagePosition::Full),
                    width_percent: Some(40),
                    ..ImageSettings::default()
                },
            )
            .unwrap();

        match &editor.blocks().last().unwrap().payload {
            BlockPayload::Image(image) => {
                assert_eq!(image.position, ImagePosition::Full);
                assert_eq!(image.width_percent, 100);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn configure_rejects_width_outside_presets() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Image, None);
        let result = editor.configure_image(
            id,
            ImageSettings {
                width_percent: Some(33),
                ..ImageSettings::default()
            },
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn configure_non_image_block_is_silent_noop() {
        let mut editor = ArticleEditor::new();
        let id = editor.blocks()[0].id;
        assert!(editor
            .configure_image(
                id,
                ImageSettings {
                    position: Some(ImagePosition::Left),
                    ..ImageSettings::default()
                }
            )
            .is_ok());
    }

    // -- documents -----------------------------------------------------------

    #[test]
    fn from_document_continues_id_sequence() {
        let mut editor = ArticleEditor::new();
        let id = editor.insert_block(BlockKind::Paragraph, None);
        editor.update_block(id, text_patch("one")).unwrap();
        let reopened = ArticleEditor::from_document(&editor.to_document());

        let max_id = reopened.blocks().iter().map(|blk| blk.id).max().unwrap();
        let mut reopened = reopened;
        let fresh = reopened.insert_block(BlockKind::Heading, None);
        assert!(fresh > max_id);
    }

    fn image_state(editor: &ArticleEditor, id: BlockId) -> UploadState {
        match &editor
            .blocks()
            .iter()
            .find(|blk| blk.id == id)
            .unwrap()
            .payload
        {
            BlockPayload::Image(image) => image.upload.clone(),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
