//! Markdown-to-block conversion: the core of the pipeline.
//!
//! A single forward scan over lines with two pieces of scan state — an
//! open/closed code-fence flag and a pending table-row buffer. Each line is
//! classified into exactly one [`LineKind`] by priority-ordered predicate
//! checks, then handled per variant. The function is total: malformed input
//! never fails, it degrades to paragraph blocks.
//!
//! ## Classification priority
//!
//! Checkbox syntax is a specialisation of bullet syntax, so the checkbox
//! pattern runs first; heading prefixes are checked from `### ` down to
//! `# ` so a level-1 match cannot swallow deeper levels.
//!
//! ## Table flushing
//!
//! A run of consecutive table rows is buffered and flushed as one table
//! block at exactly three points: a blank line, a non-table fallback line
//! (flushed before that line is classified as a paragraph), and end of
//! input. Pure separator rows (`|---|---|`) are the markdown header/body
//! divider and are consumed without being buffered.
//!
//! ## Unterminated fences
//!
//! A fence left open at end of input discards its buffered lines — no
//! partial code block is emitted. Intentional: do not change it without
//! product sign-off.

use crate::blocks::{Block, TableBlock, DEFAULT_CODE_LANGUAGE};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_TODO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^- \[([ xX])\]\s*(.*)$").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
// Header/body divider rows: only dashes, pipes, and whitespace.
static RE_TABLE_DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|?[-\s|]+\|?$").unwrap());

/// One line of input, classified into exactly one category.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Fence,
    Blank,
    Todo { checked: bool, text: String },
    Numbered(String),
    Bullet(String),
    Heading { level: u8, text: String },
    Quote(String),
    TableRow(Vec<String>),
    TableDivider,
    Plain,
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Classify a right-trimmed line. First match wins.
fn classify(line: &str) -> LineKind {
    if is_fence(line) {
        return LineKind::Fence;
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = RE_TODO.captures(line) {
        return LineKind::Todo {
            checked: caps[1].eq_ignore_ascii_case("x"),
            text: caps[2].to_string(),
        };
    }
    if let Some(caps) = RE_NUMBERED.captures(line) {
        // The numeric prefix is discarded; Notion re-numbers by document order.
        return LineKind::Numbered(caps[1].to_string());
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return LineKind::Bullet(rest.to_string());
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return LineKind::Heading {
            level: 3,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return LineKind::Heading {
            level: 2,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return LineKind::Heading {
            level: 1,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return LineKind::Quote(rest.trim().to_string());
    }

    // Some models emit doubled pipes; collapse them before the table check.
    let collapsed = line.replace("||", "|");
    if collapsed.contains('|') {
        if RE_TABLE_DIVIDER.is_match(&collapsed) {
            return LineKind::TableDivider;
        }
        let cells = collapsed
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect();
        return LineKind::TableRow(cells);
    }

    LineKind::Plain
}

/// Convert markdown text into an ordered sequence of Notion blocks.
///
/// Deterministic and total: any string input yields a block sequence, with
/// unrecognised lines becoming paragraphs. Pure — no I/O, no shared state —
/// so concurrent conversions need no coordination.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();
    let mut code: Vec<String> = Vec::new();
    let mut in_code = false;

    for raw in markdown.lines() {
        let line = raw.trim_end();

        if in_code {
            if is_fence(line) {
                blocks.push(Block::Code {
                    language: DEFAULT_CODE_LANGUAGE.to_string(),
                    body: code.join("\n"),
                });
                code.clear();
                in_code = false;
            } else {
                // Inside a fence every line is verbatim, even ones that
                // would otherwise match another pattern.
                code.push(line.to_string());
            }
            continue;
        }

        match classify(line) {
            LineKind::Fence => {
                in_code = true;
                code.clear();
            }
            LineKind::Blank => flush_table(&mut table, &mut blocks),
            LineKind::Todo { checked, text } => blocks.push(Block::TodoItem { text, checked }),
            LineKind::Numbered(text) => blocks.push(Block::NumberedItem { text }),
            LineKind::Bullet(text) => blocks.push(Block::BulletedItem { text }),
            LineKind::Heading { level: 3, text } => blocks.push(Block::Heading3 { text }),
            LineKind::Heading { level: 2, text } => blocks.push(Block::Heading2 { text }),
            LineKind::Heading { level: _, text } => blocks.push(Block::Heading1 { text }),
            LineKind::Quote(text) => blocks.push(Block::Quote { text }),
            LineKind::TableDivider => {}
            LineKind::TableRow(cells) => table.push(cells),
            LineKind::Plain => {
                // A non-table line ends a table run even without a blank
                // line; the table flushes before this line is emitted.
                flush_table(&mut table, &mut blocks);
                blocks.push(Block::Paragraph {
                    text: line.to_string(),
                });
            }
        }
    }

    flush_table(&mut table, &mut blocks);

    if in_code && !code.is_empty() {
        debug!(
            lines = code.len(),
            "discarding buffer of unterminated code fence"
        );
    }

    blocks
}

/// Flush the pending table buffer into one table block, if non-empty.
fn flush_table(rows: &mut Vec<Vec<String>>, blocks: &mut Vec<Block>) {
    if rows.is_empty() {
        return;
    }
    blocks.push(normalize_table(rows));
    rows.clear();
}

/// Normalise buffered table rows into one table block.
///
/// Width is the maximum cell count across all rows; short rows are
/// right-padded with empty cells, never truncated. Padding is recorded as a
/// non-fatal observational notice and never alters anything but the grid's
/// trailing empty cells.
pub fn normalize_table(rows: &[Vec<String>]) -> Block {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    debug!(width, rows = rows.len(), "normalising table");

    let padded: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = row.clone();
            if cells.len() < width {
                warn!(
                    from = row.len(),
                    to = width,
                    row = ?row,
                    "padded short table row"
                );
                cells.resize(width, String::new());
            }
            cells
        })
        .collect();

    Block::Table(TableBlock {
        width,
        has_header: true,
        rows: padded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(block: &Block) -> &TableBlock {
        match block {
            Block::Table(t) => t,
            other => panic!("expected table, got {}", other.kind()),
        }
    }

    #[test]
    fn heading_then_paragraph() {
        let blocks = markdown_to_blocks("# Title\n\nSome text");
        assert_eq!(
            blocks,
            vec![
                Block::Heading1 {
                    text: "Title".into()
                },
                Block::Paragraph {
                    text: "Some text".into()
                },
            ]
        );
    }

    #[test]
    fn heading_levels_checked_most_specific_first() {
        let blocks = markdown_to_blocks("# One\n## Two\n### Three");
        assert_eq!(
            blocks,
            vec![
                Block::Heading1 { text: "One".into() },
                Block::Heading2 { text: "Two".into() },
                Block::Heading3 {
                    text: "Three".into()
                },
            ]
        );
    }

    #[test]
    fn heading_without_trailing_space_is_paragraph() {
        let blocks = markdown_to_blocks("#Title");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "#Title".into()
            }]
        );
    }

    #[test]
    fn todo_items_carry_checked_state() {
        let blocks = markdown_to_blocks("- [ ] task1\n- [x] task2");
        assert_eq!(
            blocks,
            vec![
                Block::TodoItem {
                    text: "task1".into(),
                    checked: false
                },
                Block::TodoItem {
                    text: "task2".into(),
                    checked: true
                },
            ]
        );
    }

    #[test]
    fn uppercase_x_counts_as_checked() {
        let blocks = markdown_to_blocks("- [X] done");
        assert_eq!(
            blocks,
            vec![Block::TodoItem {
                text: "done".into(),
                checked: true
            }]
        );
    }

    #[test]
    fn checkbox_never_becomes_bullet() {
        let blocks = markdown_to_blocks("- [ ] not a bullet");
        assert!(matches!(blocks[0], Block::TodoItem { .. }));
    }

    #[test]
    fn malformed_checkbox_falls_back_to_bullet() {
        let blocks = markdown_to_blocks("- [y] odd bracket");
        assert_eq!(
            blocks,
            vec![Block::BulletedItem {
                text: "[y] odd bracket".into()
            }]
        );
    }

    #[test]
    fn numbered_items_discard_prefix() {
        let blocks = markdown_to_blocks("1. first\n7. second");
        assert_eq!(
            blocks,
            vec![
                Block::NumberedItem {
                    text: "first".into()
                },
                Block::NumberedItem {
                    text: "second".into()
                },
            ]
        );
    }

    #[test]
    fn numbered_without_space_is_paragraph() {
        let blocks = markdown_to_blocks("1.no space");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "1.no space".into()
            }]
        );
    }

    #[test]
    fn quote_then_bullet() {
        let blocks = markdown_to_blocks("> quoted line\n- bullet");
        assert_eq!(
            blocks,
            vec![
                Block::Quote {
                    text: "quoted line".into()
                },
                Block::BulletedItem {
                    text: "bullet".into()
                },
            ]
        );
    }

    #[test]
    fn fenced_code_verbatim() {
        let blocks = markdown_to_blocks("```py\nprint(1)\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: DEFAULT_CODE_LANGUAGE.into(),
                body: "print(1)".into()
            }]
        );
    }

    #[test]
    fn fence_suppresses_other_patterns() {
        let md = "```\n# not a heading\n- not a bullet\n| not | a table |\n```";
        let blocks = markdown_to_blocks(md);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Code { body, .. } => {
                assert_eq!(body, "# not a heading\n- not a bullet\n| not | a table |");
            }
            other => panic!("expected code, got {}", other.kind()),
        }
    }

    #[test]
    fn unterminated_fence_discards_buffer() {
        let blocks = markdown_to_blocks("before\n```\ndangling line");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "before".into()
            }]
        );
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert!(markdown_to_blocks("").is_empty());
        assert!(markdown_to_blocks("\n\n   \n").is_empty());
    }

    #[test]
    fn table_divider_rows_are_dropped() {
        let blocks = markdown_to_blocks("| A | B |\n|---|---|\n| 1 | 2 |");
        let t = table(&blocks[0]);
        assert_eq!(t.rows, vec![vec!["A", "B"], vec!["1", "2"]]);
        assert!(t.has_header);
    }

    #[test]
    fn short_rows_are_padded_to_max_width() {
        let blocks = markdown_to_blocks("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 |");
        assert_eq!(blocks.len(), 1);
        let t = table(&blocks[0]);
        assert_eq!(t.width, 2);
        assert_eq!(t.rows, vec![vec!["A", "B"], vec!["1", "2"], vec!["3", ""]]);
        // Every row matches the declared column count.
        assert!(t.rows.iter().all(|r| r.len() == t.width));
    }

    #[test]
    fn doubled_pipes_collapse_to_single() {
        let blocks = markdown_to_blocks("|| A || B ||");
        let t = table(&blocks[0]);
        assert_eq!(t.rows, vec![vec!["A", "B"]]);
    }

    #[test]
    fn blank_line_flushes_table() {
        let blocks = markdown_to_blocks("| A | B |\n\n| C | D |");
        assert_eq!(blocks.len(), 2);
        assert_eq!(table(&blocks[0]).rows, vec![vec!["A", "B"]]);
        assert_eq!(table(&blocks[1]).rows, vec![vec!["C", "D"]]);
    }

    #[test]
    fn non_table_line_flushes_table_before_itself() {
        let blocks = markdown_to_blocks("| A | B |\nafterwards");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Table(_)));
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                text: "afterwards".into()
            }
        );
    }

    #[test]
    fn end_of_input_flushes_table() {
        let blocks = markdown_to_blocks("text\n| A | B |");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[1], Block::Table(_)));
    }

    #[test]
    fn pipes_mid_sentence_still_buffer_as_table_row() {
        // Any line containing a pipe is a table row candidate; the
        // converter does not try to be smarter than that.
        let blocks = markdown_to_blocks("either | or");
        let t = table(&blocks[0]);
        assert_eq!(t.rows, vec![vec!["either", "or"]]);
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        let blocks = markdown_to_blocks("plain line   ");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "plain line".into()
            }]
        );
    }

    #[test]
    fn leading_whitespace_defeats_structural_patterns() {
        // Patterns are anchored at column zero; indented list syntax
        // degrades to a paragraph that keeps its indentation.
        let blocks = markdown_to_blocks("  - indented");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "  - indented".into()
            }]
        );
    }

    #[test]
    fn mixed_document_in_order() {
        let md = "\
# Plan

Intro paragraph.

## Steps
1. gather
2. sort
- [ ] follow up
> remember this

| Col1 | Col2 |
|------|------|
| a | b |

```
let x = 1;
```";
        let kinds: Vec<&str> = markdown_to_blocks(md).iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "heading1",
                "paragraph",
                "heading2",
                "numbered_item",
                "numbered_item",
                "todo_item",
                "quote",
                "table",
                "code",
            ]
        );
    }

    #[test]
    fn normalize_table_pads_without_truncating() {
        let rows = vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ];
        let t = match normalize_table(&rows) {
            Block::Table(t) => t,
            _ => unreachable!(),
        };
        assert_eq!(t.width, 3);
        assert_eq!(t.rows[0], vec!["a", "", ""]);
        assert_eq!(t.rows[1], vec!["b", "c", "d"]);
    }

    #[test]
    fn conversion_never_panics_on_hostile_input() {
        for input in [
            "```",
            "```\n```",
            "|",
            "||",
            "|---|",
            "- [",
            "- [ ]",
            "1.",
            "> ",
            "#",
            "\u{FEFF}",
            "| a\n|---\nb | c\n\n\n```txt\n| x |\n",
        ] {
            let _ = markdown_to_blocks(input);
        }
    }
}
