//! Paginated-document rendering.
//!
//! Turns an [`ExamDocument`] into a flat, docx-shaped element tree: styled
//! text runs, bordered tables, embedded images, and a page break ahead of
//! the solution section. The binary container itself is behind the
//! [`DocumentPacker`] capability; this module decides *what* goes on the
//! page, never how it is packed.

use std::fs;
use std::path::{Path, PathBuf};

use examcopy_engine::{ContentBlock, ExamDocument, MediaRegistry};
use thiserror::Error;
use tracing::{debug, info};

/// Body typeface of the exported exam.
pub const FONT_FAMILY: &str = "Times New Roman";
/// Body size in half-points (13pt).
pub const FONT_SIZE_BODY: u32 = 26;
const FONT_SIZE_CODE: u32 = 20;
const FONT_SIZE_SECTION_TITLE: u32 = 32;
const FONT_SIZE_FOOTER: u32 = 16;
const CODE_FONT: &str = "Courier New";
const CODE_SHADING: &str = "F3F4F6";
const COLOR_FOOTER: &str = "808080";

/// Fixed title printed ahead of the solution body.
pub const SOLUTION_TITLE: &str = "ĐÁP ÁN VÀ LỜI GIẢI CHI TIẾT";
const FOOTER_TEXT: &str = "Biên soạn bởi examcopy";

/// Embedded image box, in points.
const IMAGE_WIDTH: u32 = 450;
const IMAGE_HEIGHT: u32 = 320;

/// Default stem of exported file names: `<prefix>_<copy>.docx`.
pub const DEFAULT_PREFIX: &str = "Ban_Sao_De";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    Justified,
}

/// Twentieths-of-a-point spacing around a paragraph, plus optional fixed
/// line height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
    pub line: Option<u32>,
}

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub font: &'static str,
    /// Half-points.
    pub size: u32,
    pub bold: bool,
    pub italics: bool,
    pub underline: bool,
    pub color: Option<&'static str>,
}

impl TextRun {
    /// A body run in the document's default face.
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FONT_FAMILY,
            size: FONT_SIZE_BODY,
            bold: false,
            italics: false,
            underline: false,
            color: None,
        }
    }
}

/// One element of the packed document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocElement {
    Paragraph {
        runs: Vec<TextRun>,
        align: Align,
        spacing: Spacing,
        shading: Option<&'static str>,
    },
    /// A centered embedded image.
    Image {
        data: Vec<u8>,
        width: u32,
        height: u32,
        spacing: Spacing,
    },
    /// Full-width bordered table with centered cells. Cell text may carry
    /// raw math spans; the packer decides whether to typeset them.
    Table { rows: Vec<Vec<String>> },
    PageBreak,
}

/// The complete renderable document: body elements plus the fixed footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocModel {
    pub children: Vec<DocElement>,
    pub footer: TextRun,
}

/// Renders the exam (and its solution body, if present) into a document
/// model. The registry covers both keyspaces; unresolved or undecodable
/// media slots are omitted, never errors.
pub fn render_document(doc: &ExamDocument, registry: &MediaRegistry) -> DocModel {
    let mut children = blocks_to_elements(&doc.body, registry);

    if let Some(solution) = &doc.solution {
        children.push(DocElement::PageBreak);
        children.push(DocElement::Paragraph {
            runs: vec![TextRun {
                size: FONT_SIZE_SECTION_TITLE,
                bold: true,
                underline: true,
                ..TextRun::body(SOLUTION_TITLE)
            }],
            align: Align::Center,
            spacing: Spacing {
                before: 400,
                after: 400,
                line: None,
            },
            shading: None,
        });
        children.extend(blocks_to_elements(solution, registry));
    }

    DocModel {
        children,
        footer: TextRun {
            size: FONT_SIZE_FOOTER,
            italics: true,
            color: Some(COLOR_FOOTER),
            ..TextRun::body(FOOTER_TEXT)
        },
    }
}

fn blocks_to_elements(blocks: &[ContentBlock], registry: &MediaRegistry) -> Vec<DocElement> {
    let text_spacing = Spacing {
        before: 120,
        after: 120,
        line: Some(360),
    };

    let mut out = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Header { text, emphasized } => out.push(DocElement::Paragraph {
                runs: vec![TextRun {
                    bold: true,
                    // Emphasis on a header reads as underline on paper.
                    underline: *emphasized,
                    ..TextRun::body(text.clone())
                }],
                align: Align::Center,
                spacing: text_spacing,
                shading: None,
            }),
            ContentBlock::Paragraph { text, emphasized } => out.push(DocElement::Paragraph {
                runs: vec![TextRun {
                    bold: *emphasized,
                    ..TextRun::body(text.clone())
                }],
                align: Align::Justified,
                spacing: text_spacing,
                shading: None,
            }),
            // The page expresses gaps through paragraph spacing.
            ContentBlock::Spacer => {}
            ContentBlock::Table { rows } => out.push(DocElement::Table { rows: rows.clone() }),
            ContentBlock::Code { text, .. } => out.push(DocElement::Paragraph {
                runs: vec![TextRun {
                    font: CODE_FONT,
                    size: FONT_SIZE_CODE,
                    ..TextRun::body(text.clone())
                }],
                align: Align::Justified,
                spacing: Spacing {
                    before: 200,
                    after: 200,
                    line: None,
                },
                shading: Some(CODE_SHADING),
            }),
            ContentBlock::Media { key, .. } => {
                match registry.get(*key).and_then(|p| p.to_bytes()) {
                    Some(data) if !data.is_empty() => out.push(DocElement::Image {
                        data,
                        width: IMAGE_WIDTH,
                        height: IMAGE_HEIGHT,
                        spacing: Spacing {
                            before: 400,
                            after: 400,
                            line: None,
                        },
                    }),
                    _ => debug!(index = key.index, "media slot unresolved, image omitted"),
                }
            }
        }
    }
    out
}

/// Export failure: one terminal error per export action.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document serialization failed: {0}")]
    Pack(String),
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// External capability that packs a document model into the binary
/// container format.
pub trait DocumentPacker {
    fn pack(&self, model: &DocModel) -> Result<Vec<u8>, ExportError>;
}

/// File name for one exported copy.
pub fn export_filename(prefix: &str, copy_number: u32) -> String {
    format!("{prefix}_{copy_number}.docx")
}

/// Renders, packs, and saves one exam copy, returning the written path.
/// The save is write-then-rename: a failed export leaves no partial file
/// at the destination.
pub fn export_exam(
    doc: &ExamDocument,
    registry: &MediaRegistry,
    copy_number: u32,
    out_dir: &Path,
    packer: &dyn DocumentPacker,
) -> Result<PathBuf, ExportError> {
    let model = render_document(doc, registry);
    let bytes = packer.pack(&model)?;

    let path = out_dir.join(export_filename(DEFAULT_PREFIX, copy_number));
    save_atomic(&path, &bytes)?;
    info!(path = %path.display(), "exported exam copy");
    Ok(path)
}

fn save_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let tmp = path.with_extension("docx.part");
    let save_err = |source| ExportError::Save {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, bytes).map_err(save_err)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        save_err(e)
    })
}
