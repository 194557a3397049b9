//! Interactive-preview rendering: content blocks to an HTML fragment.
//!
//! The preview and the document renderer consume the same block sequence
//! and the same registry state, so their output structure matches block for
//! block. This side shows everything, including pending media slots (as
//! placeholder figures) and spacers.

use examcopy_engine::{ContentBlock, InlineFragment, MediaRegistry, split_math};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::math::MathRenderer;

/// Renders a block sequence to an HTML fragment. The caller owns the
/// surrounding page shell and styling.
pub fn render_preview(
    blocks: &[ContentBlock],
    registry: &MediaRegistry,
    math: &dyn MathRenderer,
) -> String {
    let mut html = String::new();
    for block in blocks {
        render_block(&mut html, block, registry, math);
    }
    html
}

fn render_block(
    html: &mut String,
    block: &ContentBlock,
    registry: &MediaRegistry,
    math: &dyn MathRenderer,
) {
    match block {
        ContentBlock::Header { text, .. } => {
            // Emphasis adds nothing here: headers render bold either way.
            html.push_str("<div class=\"exam-header\">");
            render_inline(html, text, math);
            html.push_str("</div>\n");
        }
        ContentBlock::Paragraph { text, emphasized } => {
            html.push_str("<div class=\"exam-line\">");
            if *emphasized {
                html.push_str("<strong>");
            }
            render_inline(html, text, math);
            if *emphasized {
                html.push_str("</strong>");
            }
            html.push_str("</div>\n");
        }
        ContentBlock::Spacer => html.push_str("<div class=\"exam-spacer\"></div>\n"),
        ContentBlock::Table { rows } => {
            html.push_str("<table class=\"exam-table\"><tbody>\n");
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str("<td>");
                    render_inline(html, cell, math);
                    html.push_str("</td>");
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody></table>\n");
        }
        ContentBlock::Code { text, lang } => {
            match lang {
                Some(lang) => {
                    html.push_str("<pre class=\"exam-code\"><code class=\"language-");
                    html.push_str(&encode_double_quoted_attribute(lang));
                    html.push_str("\">");
                }
                None => html.push_str("<pre class=\"exam-code\"><code>"),
            }
            html.push_str(&encode_text(text));
            html.push_str("</code></pre>\n");
        }
        ContentBlock::Media { key, .. } => match registry.get(*key) {
            Some(payload) => {
                html.push_str("<figure class=\"exam-media\"><img src=\"");
                html.push_str(&encode_double_quoted_attribute(&payload.to_uri()));
                html.push_str("\" alt=\"\"></figure>\n");
            }
            // Generation still in flight or failed; the slot stays visible
            // as a placeholder.
            None => html.push_str("<figure class=\"exam-media exam-media-pending\"></figure>\n"),
        },
    }
}

/// Runs text through the math locator; spans the typesetter rejects render
/// as inert code fragments with their delimiters intact.
fn render_inline(html: &mut String, text: &str, math: &dyn MathRenderer) {
    for fragment in split_math(text) {
        match fragment {
            InlineFragment::Text(t) => html.push_str(&encode_text(&t)),
            InlineFragment::Math { tex, display, raw } => match math.render(&tex, display) {
                Ok(rendered) => html.push_str(&rendered),
                Err(_) => {
                    html.push_str("<code class=\"math-error\">");
                    html.push_str(&encode_text(&raw));
                    html.push_str("</code>");
                }
            },
        }
    }
}
