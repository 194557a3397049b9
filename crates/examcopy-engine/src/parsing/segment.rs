//! Marker-stream segmentation.
//!
//! Splits raw model output into an ordered sequence of typed segments: prose
//! runs interleaved with the three embedded-block forms. A single left-to-
//! right pass over an explicit cursor, so the unterminated-block behavior is
//! a deliberate, testable transition rather than a pattern-engine artifact.
//!
//! Policy: an opening delimiter with no matching closer of the same kind is
//! not a block. The scanner steps past it and the text flows into the
//! surrounding prose segment. A consequence worth keeping: concatenating the
//! `raw` text of all segments always reproduces the input byte-for-byte.

use tracing::debug;

use super::cursor::Cursor;
use super::kinds::{Fence, GeometryTag, PromptTag};
use super::span::Span;

/// Classification of one maximal contiguous span of the marker stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Unmatched text between blocks; structured line-by-line later.
    Prose,
    /// `[[GEOMETRY_CODE]]...[[/GEOMETRY_CODE]]`
    GeometryCode,
    /// `[[AI_IMAGE_PROMPT]]...[[/AI_IMAGE_PROMPT]]`
    ImagePrompt,
    /// Triple-backtick fence with its trimmed info string, if any.
    FencedCode { lang: Option<String> },
}

/// A typed slice of the original input, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub kind: SegmentKind,
    pub span: Span,
    /// Verbatim source text for this span.
    pub raw: String,
}

/// Splits `text` into typed segments.
///
/// Blocks are atomic and non-overlapping: the first opening delimiter found
/// scanning left-to-right wins, and a block runs to the nearest closer of
/// the same kind (nesting is not a thing in this stream; the first closer
/// terminates). Empty input yields no segments.
pub fn segment(text: &str) -> Vec<RawSegment> {
    let mut cur = Cursor::new(text);
    let mut out = Vec::new();
    let mut prose_start = 0usize;

    while !cur.eof() {
        let matched = try_scan_tagged(&cur, GeometryTag::OPEN, GeometryTag::CLOSE)
            .map(|end| (end, SegmentKind::GeometryCode))
            .or_else(|| {
                try_scan_tagged(&cur, PromptTag::OPEN, PromptTag::CLOSE)
                    .map(|end| (end, SegmentKind::ImagePrompt))
            })
            .or_else(|| try_scan_fence(&cur));

        match matched {
            Some((end, kind)) => {
                let start = cur.pos();
                flush_prose(text, prose_start, start, &mut out);
                out.push(RawSegment {
                    kind,
                    span: Span { start, end },
                    raw: text[start..end].to_string(),
                });
                cur.jump(end);
                prose_start = end;
            }
            None => cur.bump(),
        }
    }

    flush_prose(text, prose_start, text.len(), &mut out);
    debug!(segments = out.len(), "segmented marker stream");
    out
}

/// Matches a bracket-tagged block at the cursor, returning the end offset of
/// its closing tag. `None` when the cursor isn't at the opener, or the
/// closer never arrives (prose fallback).
fn try_scan_tagged(cur: &Cursor<'_>, open: &str, close: &str) -> Option<usize> {
    if !cur.starts_with(open) {
        return None;
    }
    let close_at = cur.find_from(open.len(), close)?;
    Some(close_at + close.len())
}

/// Matches a fenced-code block at the cursor. The closer is the nearest
/// following tick triple, wherever it sits on a line.
fn try_scan_fence(cur: &Cursor<'_>) -> Option<(usize, SegmentKind)> {
    if !cur.starts_with(Fence::TICKS) {
        return None;
    }
    let close_at = cur.find_from(Fence::TICKS.len(), Fence::TICKS)?;
    let end = close_at + Fence::TICKS.len();

    let raw = &cur.rest()[..end - cur.pos()];
    let info = Fence::info(raw);
    let lang = (!info.is_empty()).then(|| info.to_string());
    Some((end, SegmentKind::FencedCode { lang }))
}

fn flush_prose(text: &str, start: usize, end: usize, out: &mut Vec<RawSegment>) {
    if end > start {
        out.push(RawSegment {
            kind: SegmentKind::Prose,
            span: Span { start, end },
            raw: text[start..end].to_string(),
        });
    }
}
