//! Delimiter vocabulary of the marker stream.
//!
//! Each embedded-block form owns its delimiter literals and the rule for
//! recovering the body text from a raw segment slice. The segmenter matches
//! on the delimiters; the block model builder calls the body helpers.

/// Plotting-code block, rendered to an image by a sandboxed interpreter.
pub struct GeometryTag;

impl GeometryTag {
    pub const OPEN: &'static str = "[[GEOMETRY_CODE]]";
    pub const CLOSE: &'static str = "[[/GEOMETRY_CODE]]";

    /// Inner text of a raw `[[GEOMETRY_CODE]]...[[/GEOMETRY_CODE]]` slice.
    pub fn body(raw: &str) -> &str {
        let s = raw.strip_prefix(Self::OPEN).unwrap_or(raw);
        s.strip_suffix(Self::CLOSE).unwrap_or(s)
    }
}

/// Natural-language image description block, resolved by an image model.
pub struct PromptTag;

impl PromptTag {
    pub const OPEN: &'static str = "[[AI_IMAGE_PROMPT]]";
    pub const CLOSE: &'static str = "[[/AI_IMAGE_PROMPT]]";

    /// Inner text of a raw `[[AI_IMAGE_PROMPT]]...[[/AI_IMAGE_PROMPT]]` slice.
    pub fn body(raw: &str) -> &str {
        let s = raw.strip_prefix(Self::OPEN).unwrap_or(raw);
        s.strip_suffix(Self::CLOSE).unwrap_or(s)
    }

    /// Removes one balanced pair of enclosing double quotes, if present.
    /// Models sometimes quote the whole prompt; an unbalanced quote is kept.
    pub fn unquote(s: &str) -> &str {
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            &s[1..s.len() - 1]
        } else {
            s
        }
    }
}

/// Triple-backtick code fence, optionally language-tagged on the opener line.
pub struct Fence;

impl Fence {
    pub const TICKS: &'static str = "```";

    /// The info string: text between the opening ticks and the first line
    /// break of the fence.
    pub fn info(raw: &str) -> &str {
        let inner = Self::inner(raw);
        inner.split('\n').next().unwrap_or("").trim()
    }

    /// Fence content after the info line, closing ticks excluded.
    pub fn body(raw: &str) -> &str {
        let inner = Self::inner(raw);
        match inner.find('\n') {
            Some(at) => &inner[at + 1..],
            None => "",
        }
    }

    /// Whether an info string marks the fence as plotting code destined for
    /// image rendering rather than verbatim display.
    pub fn is_python(info: Option<&str>) -> bool {
        info.is_some_and(|s| s.contains("python"))
    }

    fn inner(raw: &str) -> &str {
        let s = raw.strip_prefix(Self::TICKS).unwrap_or(raw);
        s.strip_suffix(Self::TICKS).unwrap_or(s)
    }
}
