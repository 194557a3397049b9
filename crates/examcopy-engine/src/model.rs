//! Renderer-agnostic document model.
//!
//! `ContentBlock` is the unit both renderers consume. Blocks are immutable
//! and rebuilt from scratch on every parse; nothing here is edited in place.

use serde::Serialize;
use uuid::Uuid;

use crate::media::{Keyspace, MediaKind, SlotKey};
use crate::parsing;

/// One structured unit of the assembled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Centered, emphasized line (exam boilerplate, section titles).
    Header { text: String, emphasized: bool },
    /// Justified body text; may contain inline math spans, which stay
    /// untouched here and are located by the renderer.
    Paragraph { text: String, emphasized: bool },
    /// One blank source line. Consecutive blanks are not collapsed.
    Spacer,
    /// Pseudo-table accumulated from consecutive `:::`-separated lines.
    /// Always has at least one row, and every row at least one cell.
    Table { rows: Vec<Vec<String>> },
    /// Verbatim code for display, from an untagged fence.
    Code { text: String, lang: Option<String> },
    /// An image slot: the source text that produces the image, and the
    /// position key under which its payload will appear in the registry.
    Media {
        key: SlotKey,
        kind: MediaKind,
        source: String,
    },
}

/// A fully parsed exam: ordered body blocks, optional solution blocks under
/// their own keyspace, and the originating file's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamDocument {
    pub body: Vec<ContentBlock>,
    pub solution: Option<Vec<ContentBlock>>,
    pub source_name: String,
}

impl ExamDocument {
    /// Parses the raw marker streams of an exam and its optional solution.
    pub fn parse(content: &str, solution: Option<&str>, source_name: impl Into<String>) -> Self {
        Self {
            body: parsing::parse_content(content, Keyspace::Exam),
            solution: solution.map(|s| parsing::parse_content(s, Keyspace::Solution)),
            source_name: source_name.into(),
        }
    }
}

/// One raw generation result, as returned by the upstream model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedExam {
    pub id: Uuid,
    pub copy_number: u32,
    pub content: String,
    pub solution: Option<String>,
}

impl GeneratedExam {
    pub fn new(copy_number: u32, content: String, solution: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            copy_number,
            content,
            solution,
        }
    }

    /// Parses this generation into the block model.
    pub fn to_document(&self, source_name: impl Into<String>) -> ExamDocument {
        ExamDocument::parse(&self.content, self.solution.as_deref(), source_name)
    }
}
