pub mod doc;
pub mod math;
pub mod preview;

// Re-export key types for easier usage
pub use doc::{
    Align, DEFAULT_PREFIX, DocElement, DocModel, DocumentPacker, ExportError, SOLUTION_TITLE,
    Spacing, TextRun, export_exam, export_filename, render_document,
};
pub use math::{MathError, MathRenderer, RawMath};
pub use preview::render_preview;
