//! LLM interaction: turn a free-text instruction into a structured draft.
//!
//! This module builds the chat request and calls the provider. It is
//! intentionally thin — all prompt engineering lives in [`crate::prompts`]
//! so it can be changed without touching retry or extraction logic here.
//!
//! ## Retry Strategy
//!
//! HTTP 429 / 503 errors from LLM APIs are transient and frequent.
//! Exponential backoff (`retry_backoff_ms * 2^attempt`) avoids hammering a
//! recovering endpoint: with 500 ms base and 3 retries the wait sequence is
//! 500 ms → 1 s → 2 s.
//!
//! ## Draft extraction
//!
//! The model is asked to respond strictly with `{"title": …, "content": …}`.
//! Models do not always comply, so extraction is lenient: the first brace-
//! delimited object in the response is parsed, and on any failure the whole
//! response text becomes the content under the fallback title. The draft
//! stage therefore never fails on a *successful* API response.

use crate::config::NoteConfig;
use crate::error::NoteError;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// Title used when the model's response carries none.
pub const FALLBACK_TITLE: &str = "Untitled";

/// The raw result of the draft stage, before post-processing.
#[derive(Debug, Clone)]
pub struct DraftResult {
    pub title: String,
    pub markdown: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
    pub retries: u8,
}

/// Ask the LLM to draft a note for the given instruction.
///
/// Retries transient failures with exponential backoff; returns
/// [`NoteError::LlmFailed`] only after all attempts are exhausted.
pub async fn draft_note(
    provider: &Arc<dyn LLMProvider>,
    instruction: &str,
    config: &NoteConfig,
) -> Result<DraftResult, NoteError> {
    let start = Instant::now();
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(instruction),
    ];

    let options = CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    };

    let mut last_err: Option<String> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "draft: retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match provider.chat(&messages, Some(&options)).await {
            Ok(response) => {
                let duration = start.elapsed();
                debug!(
                    "draft: {} input tokens, {} output tokens, {:?}",
                    response.prompt_tokens, response.completion_tokens, duration
                );

                let (title, markdown) = extract_draft(&response.content);
                return Ok(DraftResult {
                    title,
                    markdown,
                    input_tokens: response.prompt_tokens as u64,
                    output_tokens: response.completion_tokens as u64,
                    duration_ms: duration.as_millis() as u64,
                    retries: attempt as u8,
                });
            }
            Err(e) => {
                let err_msg = format!("{}", e);
                warn!("draft: attempt {} failed — {}", attempt + 1, err_msg);
                last_err = Some(err_msg);
            }
        }
    }

    Err(NoteError::LlmFailed {
        retries: config.max_retries,
        detail: last_err.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

// Models often wrap the JSON in prose or fences; grab the outermost braces.
static RE_JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// Pull `(title, content)` out of the model's response text.
///
/// Never fails: any response yields a draft, worst case the whole text
/// under [`FALLBACK_TITLE`].
pub(crate) fn extract_draft(text: &str) -> (String, String) {
    let text = text.trim();

    if let Some(m) = RE_JSON_OBJECT.find(text) {
        if let Ok(raw) = serde_json::from_str::<RawDraft>(m.as_str()) {
            let title = raw.title.trim();
            let title = if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title.to_string()
            };
            return (title, raw.content.trim().to_string());
        }
    }

    (FALLBACK_TITLE.to_string(), text.to_string())
}
