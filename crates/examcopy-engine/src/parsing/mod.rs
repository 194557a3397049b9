//! # Marker-stream parsing
//!
//! Three synchronous phases over an in-memory string, re-run from scratch
//! on every content change:
//!
//! 1. **Segmentation** (`segment`): a cursor-driven scan splits the stream
//!    into prose runs and embedded blocks (geometry code, image prompts,
//!    code fences), tolerating unterminated delimiters.
//! 2. **Line structuring** (`structure`): prose runs become headers,
//!    paragraphs, spacers, and table row-groups.
//! 3. **Block assembly** (`build`): segments map to the renderer-agnostic
//!    [`ContentBlock`](crate::model::ContentBlock) sequence, with media
//!    slots keyed by segment ordinal under an explicit keyspace.
//!
//! `inline` locates `$`-delimited math spans for the renderers; the engine
//! itself never interprets formula text.

pub mod build;
pub mod cursor;
pub mod inline;
pub mod kinds;
pub mod segment;
pub mod span;
pub mod structure;

pub use build::build_blocks;
pub use inline::{InlineFragment, split_math};
pub use segment::{RawSegment, SegmentKind, segment};
pub use span::Span;
pub use structure::structure;

use crate::media::Keyspace;
use crate::model::ContentBlock;

/// Full pipeline: raw marker stream to content blocks.
pub fn parse_content(text: &str, space: Keyspace) -> Vec<ContentBlock> {
    build_blocks(&segment::segment(text), space)
}
