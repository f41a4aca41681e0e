//! # note2notion
//!
//! Turn a free-text instruction into a structured Notion page.
//!
//! ## Why this crate?
//!
//! Capturing a thought into Notion by hand means naming a page, picking
//! block types, and typing structure — enough friction that the thought
//! often goes uncaptured. This crate takes one sentence ("note down the
//! migration plan we discussed"), lets an LLM expand it into a titled
//! markdown note, converts that markdown into native Notion blocks, and
//! creates the page. The markdown-to-blocks converter is deterministic and
//! total: any string in, a valid block list out, no parse errors ever.
//!
//! ## Pipeline Overview
//!
//! ```text
//! instruction
//!  │
//!  ├─ 1. Draft    LLM expands the instruction into {title, markdown}
//!  ├─ 2. Clean    strip outer fences, invisible chars, trailing space
//!  ├─ 3. Convert  single-pass line scan → typed Notion blocks
//!  ├─ 4. Publish  POST /v1/pages with retry and backoff
//!  └─ 5. Output   page id + URL + blocks + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use note2notion::{create_note, NoteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // LLM provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     // Notion credentials read from NOTION_TOKEN / NOTION_PARENT_PAGE_ID
//!     let config = NoteConfig::default();
//!     let output = create_note("summarise today's standup decisions", &config).await?;
//!     println!("created: {}", output.page_url);
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! The converter alone needs no network or credentials:
//!
//! ```rust
//! use note2notion::markdown_to_blocks;
//!
//! let blocks = markdown_to_blocks("# Plan\n- [ ] write tests\n- [x] ship");
//! assert_eq!(blocks.len(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `note2notion` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! note2notion = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod blocks;
pub mod config;
pub mod create;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use blocks::{Block, TableBlock, DEFAULT_CODE_LANGUAGE};
pub use config::{NoteConfig, NoteConfigBuilder, DEFAULT_NOTION_VERSION};
pub use create::{create_note, create_note_sync, draft_note, publish_markdown};
pub use error::NoteError;
pub use output::{NoteDraft, NoteOutput, NoteStats};
pub use pipeline::markdown::{markdown_to_blocks, normalize_table};
pub use pipeline::notion::PageRef;
