//! System prompts for instruction-to-note drafting.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the default behaviour (e.g.
//!    tightening the markdown subset or the JSON contract) requires editing
//!    exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    real LLM, making prompt regressions easy to catch.
//!
//! Callers can override the default via
//! [`crate::config::NoteConfig::system_prompt`]; the constant here is used
//! only when no override is provided.

/// Default system prompt for drafting a note from a user instruction.
///
/// The markdown subset listed under STRUCTURE is exactly what the block
/// converter understands; anything else degrades to plain paragraphs.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI note-creator. Extract a short descriptive title and detailed note content from the user's instruction.

Follow these rules precisely:

1. RESPONSE FORMAT
   - Respond strictly with a single JSON object: {"title": "...", "content": "..."}
   - Do NOT wrap the JSON in code fences
   - Do NOT add commentary before or after the JSON

2. TITLE
   - Short and descriptive (a few words), suitable as a page title

3. STRUCTURE (inside "content", markdown)
   - Use # for the main heading, ## for sections, ### for subsections
   - Use - for unordered lists and 1. 2. 3. for ordered lists
   - Use - [ ] and - [x] for actionable checklist items
   - Use > for callouts worth remembering
   - Use GFM pipe tables for tabular data
   - Wrap code in triple-backtick fences
   - Plain text only: no bold, italic, or links

4. CONTENT
   - Be concrete and complete; expand the instruction into a useful note
   - Do not invent facts the instruction does not support"#;
