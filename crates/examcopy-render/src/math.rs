//! Math typesetting capability.
//!
//! Formula spans are opaque to the engine; renderers locate them with
//! [`split_math`](examcopy_engine::split_math) and hand each span to a
//! [`MathRenderer`]. A failure for one span must never take down the block:
//! callers catch [`MathError`] and fall back to the raw delimited text.

use thiserror::Error;

/// A formula the typesetter rejected.
#[derive(Debug, Error)]
#[error("math typesetting failed: {0}")]
pub struct MathError(pub String);

/// External typesetting capability (KaTeX-style: TeX in, markup out).
pub trait MathRenderer {
    /// Typesets one formula. `display` selects display-mode layout.
    fn render(&self, tex: &str, display: bool) -> Result<String, MathError>;
}

/// Built-in fallback that performs no typesetting: the TeX source is shown
/// as-is in an inert styled span. Used by surfaces without a math engine
/// (the CLI dump) and in tests.
pub struct RawMath;

impl MathRenderer for RawMath {
    fn render(&self, tex: &str, display: bool) -> Result<String, MathError> {
        let class = if display { "math math-display" } else { "math" };
        Ok(format!(
            "<span class=\"{class}\">{}</span>",
            html_escape::encode_text(tex)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_math_escapes_the_source() {
        let html = RawMath.render("a < b", false).unwrap();
        assert_eq!(html, "<span class=\"math\">a &lt; b</span>");
    }

    #[test]
    fn display_mode_gets_its_own_class() {
        let html = RawMath.render("x", true).unwrap();
        assert!(html.contains("math-display"));
    }
}
