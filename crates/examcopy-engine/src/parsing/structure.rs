//! Line-level structuring of prose runs.
//!
//! Within a prose segment, lines become headers, paragraphs, spacers, or
//! accumulate into table row-groups. The accumulation is greedy and single-
//! pass: a line belongs to at most one group, and a group ends at the first
//! line without the column separator. Nothing is ever reordered.

use crate::model::ContentBlock;

/// Three-character column separator of the pseudo-table rows.
pub const TABLE_SEPARATOR: &str = ":::";

/// Char-count bounds of the all-caps header rule, both exclusive.
const HEADER_MIN_CHARS: usize = 5;
const HEADER_MAX_CHARS: usize = 120;

/// Boilerplate substrings that mark a line as an exam header regardless of
/// casing or length: the issuing-department line, the exam-number line, and
/// the exam-session line. A policy table, not a grammar.
pub fn header_markers() -> [&'static str; 3] {
    ["SỞ GD&ĐT", "ĐỀ SỐ", "KỲ THI"]
}

/// Structures one prose run into Header/Paragraph/Spacer/Table blocks.
pub fn structure(prose: &str) -> Vec<ContentBlock> {
    let mut st = LineStructurer::new();
    for line in prose.split('\n') {
        st.push(line);
    }
    st.finish()
}

/// Single-pass line grouper. Pushing a separator-bearing line opens (or
/// extends) a table row-group; any other line flushes the group first.
struct LineStructurer {
    rows: Vec<Vec<String>>,
    out: Vec<ContentBlock>,
}

impl LineStructurer {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            out: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        if line.contains(TABLE_SEPARATOR) {
            self.rows.push(split_row(line));
            return;
        }
        self.flush_table();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.out.push(ContentBlock::Spacer);
            return;
        }

        let (text, emphasized) = strip_emphasis(trimmed);
        if is_header(&text) {
            self.out.push(ContentBlock::Header { text, emphasized });
        } else {
            self.out.push(ContentBlock::Paragraph { text, emphasized });
        }
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_table();
        self.out
    }

    fn flush_table(&mut self) {
        if !self.rows.is_empty() {
            self.out.push(ContentBlock::Table {
                rows: std::mem::take(&mut self.rows),
            });
        }
    }
}

/// Splits a row line into trimmed cells. Empty cells (trailing or doubled
/// separators) are dropped, but a row keeps at least one cell.
fn split_row(line: &str) -> Vec<String> {
    let cells: Vec<String> = line
        .trim()
        .split(TABLE_SEPARATOR)
        .map(|c| strip_emphasis(c.trim()).0)
        .filter(|c| !c.is_empty())
        .collect();
    if cells.is_empty() {
        vec![String::new()]
    } else {
        cells
    }
}

/// Removes the `**` emphasis markers. The flag is set only when the entire
/// trimmed line was wrapped by one pair.
fn strip_emphasis(trimmed: &str) -> (String, bool) {
    let wrapped = trimmed.len() >= 4 && trimmed.starts_with("**") && trimmed.ends_with("**");
    (trimmed.replace("**", ""), wrapped)
}

/// Header policy: a known boilerplate marker, or an all-caps line of
/// plausible title length. Heuristic by design.
fn is_header(text: &str) -> bool {
    if header_markers().iter().any(|m| text.contains(m)) {
        return true;
    }
    let chars = text.chars().count();
    chars > HEADER_MIN_CHARS && chars < HEADER_MAX_CHARS && text.to_uppercase() == text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn para(text: &str) -> ContentBlock {
        ContentBlock::Paragraph {
            text: text.to_string(),
            emphasized: false,
        }
    }

    #[test]
    fn table_rows_accumulate_until_separator_stops() {
        let blocks = structure("a:::b\nc:::d\ne");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Table {
                    rows: vec![
                        vec!["a".to_string(), "b".to_string()],
                        vec!["c".to_string(), "d".to_string()],
                    ]
                },
                para("e"),
            ]
        );
    }

    #[test]
    fn two_groups_split_by_plain_line() {
        let blocks = structure("a:::b\nx\nc:::d");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], ContentBlock::Table { .. }));
        assert_eq!(blocks[1], para("x"));
        assert!(matches!(blocks[2], ContentBlock::Table { .. }));
    }

    #[test]
    fn trailing_separator_cells_are_dropped() {
        let blocks = structure("a:::b:::");
        assert_eq!(
            blocks,
            vec![ContentBlock::Table {
                rows: vec![vec!["a".to_string(), "b".to_string()]]
            }]
        );
    }

    #[test]
    fn all_empty_row_keeps_one_cell() {
        let blocks = structure(":::");
        assert_eq!(
            blocks,
            vec![ContentBlock::Table {
                rows: vec![vec![String::new()]]
            }]
        );
    }

    #[test]
    fn cell_emphasis_markers_are_removed() {
        let blocks = structure("**x**:::y");
        assert_eq!(
            blocks,
            vec![ContentBlock::Table {
                rows: vec![vec!["x".to_string(), "y".to_string()]]
            }]
        );
    }

    #[test]
    fn blank_lines_each_produce_a_spacer() {
        let blocks = structure("a\n\n\nb");
        assert_eq!(
            blocks,
            vec![para("a"), ContentBlock::Spacer, ContentBlock::Spacer, para("b")]
        );
    }

    #[rstest]
    #[case("KỲ THI TRUNG HỌC PHỔ THÔNG", true)] // all caps, plausible length
    #[case("x + y = 5", false)]
    #[case("SỞ GD&ĐT HÀ NỘI", true)] // institution marker
    #[case("Đề số 3", false)] // marker is case-sensitive
    #[case("ĐỀ SỐ 3", true)] // exam-number marker, under the length floor
    #[case("ABCDE", false)] // caps but too short
    #[case("Câu 1. Cho hàm số", false)]
    fn header_policy_table(#[case] line: &str, #[case] expect_header: bool) {
        let blocks = structure(line);
        assert_eq!(blocks.len(), 1);
        let got = matches!(blocks[0], ContentBlock::Header { .. });
        assert_eq!(got, expect_header, "line: {line:?}");
    }

    #[test]
    fn wrapped_line_is_emphasized_with_markers_removed() {
        let blocks = structure("**SỞ GD&ĐT**");
        assert_eq!(
            blocks,
            vec![ContentBlock::Header {
                text: "SỞ GD&ĐT".to_string(),
                emphasized: true,
            }]
        );
    }

    #[test]
    fn inner_markers_strip_without_setting_the_flag() {
        let blocks = structure("chọn đáp án **đúng** dưới đây");
        assert_eq!(blocks, vec![para("chọn đáp án đúng dưới đây")]);
    }

    #[test]
    fn math_spans_pass_through_untouched() {
        let blocks = structure("Giải phương trình $x^2 - 1 = 0$.");
        assert_eq!(blocks, vec![para("Giải phương trình $x^2 - 1 = 0$.")]);
    }
}
