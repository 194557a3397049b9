//! Block model assembly.
//!
//! One pass over the segment sequence: prose segments are spliced through
//! the line structurer, embedded-media segments become single `Media`
//! blocks addressed by their *segment* ordinal under the caller's keyspace.
//! The builder never resolves payloads (that happens at render time through
//! the registry), so its output is a pure function of the text.

use crate::media::{Keyspace, MediaKind, SlotKey};
use crate::model::ContentBlock;

use super::kinds::{Fence, GeometryTag, PromptTag};
use super::segment::{RawSegment, SegmentKind};
use super::structure::structure;

/// Converts segments into the ordered content-block sequence.
pub fn build_blocks(segments: &[RawSegment], space: Keyspace) -> Vec<ContentBlock> {
    let mut out = Vec::new();
    for (index, seg) in segments.iter().enumerate() {
        match &seg.kind {
            SegmentKind::Prose => out.extend(structure(&seg.raw)),
            SegmentKind::GeometryCode => out.push(ContentBlock::Media {
                key: SlotKey::new(space, index),
                kind: MediaKind::Geometry,
                source: GeometryTag::body(&seg.raw).trim().to_string(),
            }),
            SegmentKind::ImagePrompt => out.push(ContentBlock::Media {
                key: SlotKey::new(space, index),
                kind: MediaKind::AiImage,
                source: prompt_source(&seg.raw),
            }),
            SegmentKind::FencedCode { lang } => {
                let text = Fence::body(&seg.raw).trim().to_string();
                if Fence::is_python(lang.as_deref()) {
                    out.push(ContentBlock::Media {
                        key: SlotKey::new(space, index),
                        kind: MediaKind::Geometry,
                        source: text,
                    });
                } else {
                    out.push(ContentBlock::Code {
                        text,
                        lang: lang.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Prompt body: tags stripped, trimmed, one pair of enclosing quotes
/// removed, re-trimmed.
fn prompt_source(raw: &str) -> String {
    PromptTag::unquote(PromptTag::body(raw).trim())
        .trim()
        .to_string()
}
