//! Output types returned by the top-level entry points.

use crate::blocks::Block;
use serde::{Deserialize, Serialize};

/// The structured note the LLM drafted, after post-processing.
///
/// Returned by [`crate::draft_note`] when the caller wants to review the
/// content before publishing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub markdown: String,
}

/// The result of a full create-note run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteOutput {
    /// Title of the created page.
    pub title: String,
    /// Notion page id.
    pub page_id: String,
    /// Notion page URL.
    pub page_url: String,
    /// The blocks that were sent to Notion, in document order.
    pub blocks: Vec<Block>,
    /// Timing and token accounting.
    pub stats: NoteStats,
}

/// Statistics about one create-note run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteStats {
    /// Tokens consumed by the draft prompt.
    pub input_tokens: u64,
    /// Tokens generated by the model.
    pub output_tokens: u64,
    /// Retries the LLM call needed before succeeding.
    pub llm_retries: u8,
    /// Number of blocks the converter emitted.
    pub block_count: usize,
    /// Wall-clock time of the LLM call, in milliseconds.
    pub llm_duration_ms: u64,
    /// Wall-clock time of the Notion call, in milliseconds.
    pub publish_duration_ms: u64,
    /// End-to-end wall-clock time, in milliseconds.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_json_round_trip() {
        let output = NoteOutput {
            title: "Plan".into(),
            page_id: "pid".into(),
            page_url: "https://www.notion.so/Plan-pid".into(),
            blocks: vec![Block::Heading1 { text: "Plan".into() }],
            stats: NoteStats {
                input_tokens: 120,
                output_tokens: 450,
                block_count: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string_pretty(&output).expect("serialise");
        let back: NoteOutput = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back.title, output.title);
        assert_eq!(back.stats.output_tokens, 450);
        assert_eq!(back.blocks.len(), 1);
    }
}
