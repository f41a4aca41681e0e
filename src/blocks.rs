//! The Notion block model and its wire format.
//!
//! [`Block`] is the typed output of the markdown converter: one variant per
//! Notion block kind the converter can emit. The enum is plain data — no
//! Notion JSON leaks into the converter — and [`Block::to_api_value`]
//! produces the exact object the Notion API expects for each variant.
//!
//! Notion wraps every piece of text in a "rich text" envelope. This crate
//! emits exactly one plain-text run per cell/line; inline formatting
//! (bold, italic, links) is not parsed and arrives as literal characters.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Language tag attached to every emitted code block.
///
/// Fence info strings (` ```py `) are discarded during conversion, so all
/// code blocks carry Notion's untagged value. Callers that need real
/// language tags must generalise the fence handling first.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

/// One structural unit of a Notion page.
///
/// Produced in document order by [`crate::markdown_to_blocks`]; the numbered
/// list is implicitly re-numbered by position, so `NumberedItem` does not
/// store the original numeric prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading1 { text: String },
    Heading2 { text: String },
    Heading3 { text: String },
    Paragraph { text: String },
    BulletedItem { text: String },
    NumberedItem { text: String },
    TodoItem { text: String, checked: bool },
    Quote { text: String },
    Code { language: String, body: String },
    Table(TableBlock),
}

/// A normalised table: every row has exactly `width` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Column count — the maximum raw row length seen before padding.
    pub width: usize,
    /// The first row is always treated as a header row.
    pub has_header: bool,
    /// Row-major cell text, right-padded with empty strings to `width`.
    pub rows: Vec<Vec<String>>,
}

/// One plain-text rich-text run, Notion's smallest text envelope.
fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

impl Block {
    /// Serialise this block into the Notion API's block object.
    ///
    /// The returned value is one element of the `children` array in a
    /// page-creation request.
    pub fn to_api_value(&self) -> Value {
        match self {
            Block::Heading1 { text } => json!({
                "object": "block",
                "type": "heading_1",
                "heading_1": { "rich_text": rich_text(text) }
            }),
            Block::Heading2 { text } => json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": rich_text(text) }
            }),
            Block::Heading3 { text } => json!({
                "object": "block",
                "type": "heading_3",
                "heading_3": { "rich_text": rich_text(text) }
            }),
            Block::Paragraph { text } => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": rich_text(text) }
            }),
            Block::BulletedItem { text } => json!({
                "object": "block",
                "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": rich_text(text) }
            }),
            Block::NumberedItem { text } => json!({
                "object": "block",
                "type": "numbered_list_item",
                "numbered_list_item": { "rich_text": rich_text(text) }
            }),
            Block::TodoItem { text, checked } => json!({
                "object": "block",
                "type": "to_do",
                "to_do": { "rich_text": rich_text(text), "checked": checked }
            }),
            Block::Quote { text } => json!({
                "object": "block",
                "type": "quote",
                "quote": { "rich_text": rich_text(text) }
            }),
            Block::Code { language, body } => json!({
                "object": "block",
                "type": "code",
                "code": { "rich_text": rich_text(body), "language": language }
            }),
            Block::Table(table) => table.to_api_value(),
        }
    }

    /// Short kind name used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading1 { .. } => "heading1",
            Block::Heading2 { .. } => "heading2",
            Block::Heading3 { .. } => "heading3",
            Block::Paragraph { .. } => "paragraph",
            Block::BulletedItem { .. } => "bulleted_item",
            Block::NumberedItem { .. } => "numbered_item",
            Block::TodoItem { .. } => "todo_item",
            Block::Quote { .. } => "quote",
            Block::Code { .. } => "code",
            Block::Table(_) => "table",
        }
    }
}

impl TableBlock {
    fn to_api_value(&self) -> Value {
        // Notion expects each row's cells as a list of rich-text run lists.
        let children: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<Value> = row.iter().map(|c| rich_text(c)).collect();
                json!({
                    "object": "block",
                    "type": "table_row",
                    "table_row": { "cells": cells }
                })
            })
            .collect();

        json!({
            "object": "block",
            "type": "table",
            "table": {
                "table_width": self.width,
                "has_column_header": self.has_header,
                "has_row_header": false,
                "children": children
            }
        })
    }
}
