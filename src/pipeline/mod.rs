//! Pipeline stages for instruction-to-Notion-page conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different document service) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! instruction ──▶ draft ──▶ postprocess ──▶ markdown ──▶ notion
//!  (free text)    (LLM)      (cleanup)      (blocks)    (REST API)
//! ```
//!
//! 1. [`draft`]       — ask the LLM for `{title, content}`; the only stage
//!    with LLM I/O, with retry/backoff
//! 2. [`postprocess`] — deterministic text cleanup of model quirks (outer
//!    fences, CRLF, invisible Unicode)
//! 3. [`markdown`]    — the pure line-scanning converter producing typed
//!    Notion blocks; the core of the crate
//! 4. [`notion`]      — create the page via the Notion REST API

pub mod draft;
pub mod markdown;
pub mod notion;
pub mod postprocess;
