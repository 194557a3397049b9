//! Math-span location.
//!
//! The core treats formula text as opaque: this module only finds the
//! `$...$` / `$$...$$` spans so a renderer can hand them to its typesetting
//! capability. Display spans are tried before inline spans (a `$$` opener
//! must not be read as an empty inline span), and an unclosed delimiter
//! degrades to plain text.

use super::cursor::Cursor;

/// A run of paragraph/header/cell text, split around math spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineFragment {
    Text(String),
    Math {
        /// Formula source with the delimiters stripped.
        tex: String,
        /// True for `$$...$$` display spans.
        display: bool,
        /// The original delimited text, kept for fail-soft rendering when
        /// the typesetter rejects the formula.
        raw: String,
    },
}

const DISPLAY: &str = "$$";
const INLINE: &str = "$";

/// Splits `text` into plain and math fragments. Concatenating fragment
/// sources (`Text` content and `Math` raws) reproduces the input.
pub fn split_math(text: &str) -> Vec<InlineFragment> {
    let mut cur = Cursor::new(text);
    let mut out = Vec::new();
    let mut text_start = 0usize;

    while !cur.eof() {
        let matched = try_span(&cur, DISPLAY).or_else(|| try_span(&cur, INLINE));
        match matched {
            Some(end) => {
                let start = cur.pos();
                flush_text(text, text_start, start, &mut out);
                let raw = &text[start..end];
                let delim = if raw.starts_with(DISPLAY) && raw.len() >= 4 {
                    DISPLAY
                } else {
                    INLINE
                };
                out.push(InlineFragment::Math {
                    tex: raw[delim.len()..raw.len() - delim.len()].to_string(),
                    display: delim == DISPLAY,
                    raw: raw.to_string(),
                });
                cur.jump(end);
                text_start = end;
            }
            None => cur.bump(),
        }
    }

    flush_text(text, text_start, text.len(), &mut out);
    out
}

/// Matches a span delimited by `delim` at the cursor, returning its end
/// offset. `None` when the cursor isn't at the delimiter or no closer
/// follows.
fn try_span(cur: &Cursor<'_>, delim: &str) -> Option<usize> {
    if !cur.starts_with(delim) {
        return None;
    }
    let close_at = cur.find_from(delim.len(), delim)?;
    Some(close_at + delim.len())
}

fn flush_text(text: &str, start: usize, end: usize, out: &mut Vec<InlineFragment>) {
    if end > start {
        out.push(InlineFragment::Text(text[start..end].to_string()));
    }
}
