//! Codec between editor block state and the stored document format.
//!
//! Encoding is lossy by design in one narrow way: text blocks go into
//! `mainContent` and image blocks into `contentImages`, so the exact
//! interleaving of images between paragraphs is not preserved. Decoding
//! re-inserts images with a fixed heuristic (first image after the first
//! text block, then one image every two text positions). Everything else
//! round-trips exactly.

use crate::block::{is_empty_block, Block, BlockPayload, ImageBlock, UploadState};
use crate::document::{
    ImagePlacement, InlineNode, ListChild, ListFormat, RichTextNode, StorageDocument,
};

// ---------------------------------------------------------------------------
// Encode: editor blocks -> storage document
// ---------------------------------------------------------------------------

/// Serialize an ordered block sequence into the storage document format.
///
/// Empty blocks and image blocks without a resolved asset are dropped;
/// blank list items are filtered out of surviving lists.
pub fn encode(blocks: &[Block]) -> StorageDocument {
    let mut main_content = Vec::new();
    let mut content_images = Vec::new();

    for block in blocks {
        if is_empty_block(block) {
            continue;
        }
        match &block.payload {
            BlockPayload::Heading { text, level } => main_content.push(RichTextNode::Heading {
                level: *level,
                children: vec![InlineNode::text(text.clone())],
            }),
            BlockPayload::Paragraph { text } => main_content.push(RichTextNode::Paragraph {
                children: vec![InlineNode::text(text.clone())],
            }),
            BlockPayload::Quote { text, author } => main_content.push(RichTextNode::Quote {
                author: author
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from),
                children: vec![InlineNode::text(text.clone())],
            }),
            BlockPayload::List { items, ordered } => main_content.push(RichTextNode::List {
                format: if *ordered {
                    ListFormat::Ordered
                } else {
                    ListFormat::Unordered
                },
                children: items
                    .iter()
                    .filter(|item| !item.trim().is_empty())
                    .map(|item| ListChild::ListItem {
                        children: vec![InlineNode::text(item.clone())],
                    })
                    .collect(),
            }),
            BlockPayload::Image(image) => {
                // is_empty_block already excluded unresolved images.
                if let Some(asset_id) = image.asset_id {
                    content_images.push(ImagePlacement {
                        image: asset_id,
                        caption: image.caption.clone(),
                        alt: image.alt.clone(),
                        position: image.position,
                        width: image.width_percent,
                        show_caption: image.show_caption,
                        rounded: image.rounded,
                        shadow: image.shadow,
                        pair_with_next: image.pair_with_next,
                    });
                }
            }
        }
    }

    StorageDocument {
        main_content,
        content_images,
    }
}

// ---------------------------------------------------------------------------
// Decode: storage document -> editor blocks
// ---------------------------------------------------------------------------

/// Deserialize a storage document back into an ordered block sequence
/// for editing.
///
/// Text nodes map back one-to-one. Image placements are interleaved with
/// the text using the fixed heuristic described in the module docs; when
/// the document has at most one text block, images are appended at the
/// end. An empty document yields a single empty paragraph, keeping the
/// editor's non-empty invariant.
///
/// Block ids are assigned sequentially starting at 1.
pub fn decode(document: &StorageDocument) -> Vec<Block> {
    let text_payloads: Vec<BlockPayload> = document
        .main_content
        .iter()
        .map(node_to_payload)
        .collect();

    let image_payloads: Vec<BlockPayload> = document
        .content_images
        .iter()
        .map(placement_to_payload)
        .collect();

    let mut payloads = interleave(text_payloads, image_payloads);

    if payloads.is_empty() {
        payloads.push(BlockPayload::Paragraph {
            text: String::new(),
        });
    }

    payloads
        .into_iter()
        .zip(1..)
        .map(|(payload, id)| Block { id, payload })
        .collect()
}

fn node_to_payload(node: &RichTextNode) -> BlockPayload {
    match node {
        RichTextNode::Heading { level, children } => BlockPayload::Heading {
            text: inline_text(children),
            level: *level,
        },
        RichTextNode::Paragraph { children } => BlockPayload::Paragraph {
            text: inline_text(children),
        },
        RichTextNode::Quote { author, children } => BlockPayload::Quote {
            text: inline_text(children),
            author: author.clone(),
        },
        RichTextNode::List { format, children } => BlockPayload::List {
            items: children
                .iter()
                .map(|ListChild::ListItem { children }| inline_text(children))
                .collect(),
            ordered: *format == ListFormat::Ordered,
        },
    }
}

fn placement_to_payload(placement: &ImagePlacement) -> BlockPayload {
    BlockPayload::Image(ImageBlock {
        asset_id: Some(placement.image),
        // The placement record only stores the asset id; the URL is
        // re-resolved against the asset store when needed.
        asset_url: None,
        alt: placement.alt.clone(),
        caption: placement.caption.clone(),
        position: placement.position,
        width_percent: placement.width,
        show_caption: placement.show_caption,
        rounded: placement.rounded,
        shadow: placement.shadow,
        pair_with_next: placement.pair_with_next,
        upload: UploadState::Done,
    })
}

/// Concatenate the text runs of a node's children.
pub(crate) fn inline_text(children: &[InlineNode]) -> String {
    children
        .iter()
        .map(|InlineNode::Text { text }| text.as_str())
        .collect()
}

/// Re-insert image payloads between text payloads.
///
/// With two or more text blocks: the first image lands right after the
/// first text block, then one image after every second text block.
/// Leftover images, and all images when there is at most one text block,
/// go at the end.
fn interleave(text: Vec<BlockPayload>, images: Vec<BlockPayload>) -> Vec<BlockPayload> {
    if text.len() <= 1 {
        let mut out = text;
        out.extend(images);
        return out;
    }

    let mut images = images.into_iter();
    let mut out = Vec::with_capacity(text.len() + images.len());

    for (index, payload) in text.into_iter().enumerate() {
        out.push(payload);
        if index % 2 == 0 {
            if let Some(image) = images.next() {
                out.push(image);
            }
        }
    }

    out.extend(images);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
