//! Both renderers consume the same block model and the same registry state;
//! whatever one shows, the other shows in the same order. Spacers and
//! pending slots are the documented exceptions: the preview keeps them
//! visible, the paginated target expresses them as spacing and omissions.

use examcopy_engine::{
    ContentBlock, ExamDocument, Keyspace, MediaPayload, MediaRegistry, SlotKey,
};
use examcopy_render::{DocElement, RawMath, render_document, render_preview};
use pretty_assertions::assert_eq;

const SAMPLE: &str = "\
ĐỀ SỐ 1\n\
Câu 1. Tính $x^2$ với bảng sau:\n\
a:::b\n\
c:::d\n\
[[GEOMETRY_CODE]]plt.plot()[[/GEOMETRY_CODE]]\n\
Câu 2. Xem hình:\n\
[[AI_IMAGE_PROMPT]]\"a cube\"[[/AI_IMAGE_PROMPT]]\n\
```\n\
print(1)\n\
```";

/// Structural signature shared by both targets: one tag per visible block,
/// in document order.
fn doc_signature(elements: &[DocElement]) -> Vec<String> {
    elements
        .iter()
        .map(|e| match e {
            DocElement::Paragraph { runs, align, .. } => {
                format!("text:{:?}:{}", align, runs[0].text)
            }
            DocElement::Image { .. } => "image".to_string(),
            DocElement::Table { rows } => format!("table:{}x{}", rows.len(), rows[0].len()),
            DocElement::PageBreak => "break".to_string(),
        })
        .collect()
}

#[test]
fn preview_and_document_show_the_same_structure() {
    let doc = ExamDocument::parse(SAMPLE, None, "de_goc.pdf");
    let registry = MediaRegistry::new();
    // One slot resolved, one still pending.
    registry.insert(
        SlotKey::new(Keyspace::Exam, 1),
        MediaPayload::Uri("data:image/png;base64,AQID".into()),
    );

    let html = render_preview(&doc.body, &registry, &RawMath);
    let model = render_document(&doc, &registry);

    // Same ordering of the visible pieces in both targets.
    let header_at = html.find("exam-header").unwrap();
    let table_at = html.find("exam-table").unwrap();
    let img_at = html.find("<img").unwrap();
    let pending_at = html.find("exam-media-pending").unwrap();
    let code_at = html.find("exam-code").unwrap();
    assert!(header_at < table_at && table_at < img_at);
    assert!(img_at < pending_at && pending_at < code_at);

    let signature = doc_signature(&model.children);
    assert_eq!(
        signature,
        vec![
            "text:Center:ĐỀ SỐ 1",
            "text:Justified:Câu 1. Tính $x^2$ với bảng sau:",
            "table:2x2",
            "image",
            "text:Justified:Câu 2. Xem hình:",
            "text:Justified:print(1)",
        ]
    );

    // Resolved slots render on both sides; the pending one only as the
    // preview placeholder.
    assert_eq!(html.matches("<img").count(), 1);
    assert_eq!(
        model
            .children
            .iter()
            .filter(|e| matches!(e, DocElement::Image { .. }))
            .count(),
        1
    );

    // Table shape agrees cell for cell.
    let DocElement::Table { rows } = &model.children[2] else {
        panic!("expected the table third");
    };
    assert_eq!(rows, &vec![vec!["a", "b"], vec!["c", "d"]]);
    assert!(html.contains("<td>a</td><td>b</td>"));
}

#[test]
fn block_counts_match_between_targets() {
    let doc = ExamDocument::parse(SAMPLE, None, "de_goc.pdf");
    let registry = MediaRegistry::new();
    let html = render_preview(&doc.body, &registry, &RawMath);
    let model = render_document(&doc, &registry);

    let headers = doc
        .body
        .iter()
        .filter(|b| matches!(b, ContentBlock::Header { .. }))
        .count();
    assert_eq!(html.matches("exam-header").count(), headers);
    assert_eq!(
        model
            .children
            .iter()
            .filter(|e| matches!(
                e,
                DocElement::Paragraph {
                    align: examcopy_render::Align::Center,
                    ..
                }
            ))
            .count(),
        headers
    );
}
