//! Top-level entry points: draft, convert, and publish in one call.
//!
//! [`create_note`] runs the whole pipeline. The partial entry points exist
//! because the stages are useful on their own: [`draft_note`] stops before
//! Notion (review the content first), [`publish_markdown`] skips the LLM
//! (the caller already has markdown), and the pure converter is exported
//! directly as [`crate::markdown_to_blocks`].

use crate::config::NoteConfig;
use crate::error::NoteError;
use crate::output::{NoteDraft, NoteOutput, NoteStats};
use crate::pipeline::{draft, markdown, notion, postprocess};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Model used when a provider name is given without a model.
const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Create a Notion page from a free-text instruction.
///
/// This is the primary entry point for the library. Credentials and the
/// LLM provider are resolved up front so a misconfigured environment fails
/// before any tokens are spent.
///
/// # Errors
/// - [`NoteError::NotionNotConfigured`] / [`NoteError::ProviderNotConfigured`]
///   for missing credentials
/// - [`NoteError::LlmFailed`] when the draft call exhausts its retries
/// - [`NoteError::NotionApiError`] and friends when page creation fails
pub async fn create_note(
    instruction: impl AsRef<str>,
    config: &NoteConfig,
) -> Result<NoteOutput, NoteError> {
    let total_start = Instant::now();
    let instruction = instruction.as_ref();
    info!("creating note for instruction ({} chars)", instruction.len());

    // ── Step 1: Resolve collaborators (fail fast) ────────────────────────
    let creds = notion::resolve_credentials(config)?;
    let provider = resolve_provider(config)?;

    // ── Step 2: Draft via LLM ────────────────────────────────────────────
    let drafted = draft::draft_note(&provider, instruction, config).await?;

    // ── Step 3: Clean up and convert to blocks ───────────────────────────
    let cleaned = postprocess::clean_note_markdown(&drafted.markdown);
    let blocks = markdown::markdown_to_blocks(&cleaned);
    debug!(blocks = blocks.len(), title = %drafted.title, "draft converted");

    // ── Step 4: Publish ──────────────────────────────────────────────────
    let publish_start = Instant::now();
    let page = notion::create_page(&creds, &drafted.title, &blocks, config).await?;
    let publish_duration_ms = publish_start.elapsed().as_millis() as u64;

    let stats = NoteStats {
        input_tokens: drafted.input_tokens,
        output_tokens: drafted.output_tokens,
        llm_retries: drafted.retries,
        block_count: blocks.len(),
        llm_duration_ms: drafted.duration_ms,
        publish_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "note created: '{}' → {} ({} blocks, {}ms total)",
        drafted.title, page.url, stats.block_count, stats.total_duration_ms
    );

    Ok(NoteOutput {
        title: drafted.title,
        page_id: page.id,
        page_url: page.url,
        blocks,
        stats,
    })
}

/// Draft a note without publishing it.
///
/// Runs the LLM and cleanup stages only; no Notion credentials required.
pub async fn draft_note(
    instruction: impl AsRef<str>,
    config: &NoteConfig,
) -> Result<NoteDraft, NoteError> {
    let provider = resolve_provider(config)?;
    let drafted = draft::draft_note(&provider, instruction.as_ref(), config).await?;
    Ok(NoteDraft {
        title: drafted.title,
        markdown: postprocess::clean_note_markdown(&drafted.markdown),
    })
}

/// Publish caller-supplied markdown as a Notion page, skipping the LLM.
pub async fn publish_markdown(
    title: impl AsRef<str>,
    markdown_text: impl AsRef<str>,
    config: &NoteConfig,
) -> Result<NoteOutput, NoteError> {
    let total_start = Instant::now();
    let title = title.as_ref();

    let creds = notion::resolve_credentials(config)?;
    let cleaned = postprocess::clean_note_markdown(markdown_text.as_ref());
    let blocks = markdown::markdown_to_blocks(&cleaned);

    let publish_start = Instant::now();
    let page = notion::create_page(&creds, title, &blocks, config).await?;
    let publish_duration_ms = publish_start.elapsed().as_millis() as u64;

    Ok(NoteOutput {
        title: title.to_string(),
        page_id: page.id,
        page_url: page.url,
        stats: NoteStats {
            block_count: blocks.len(),
            publish_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            ..Default::default()
        },
        blocks,
    })
}

/// Synchronous wrapper around [`create_note`].
///
/// Creates a temporary tokio runtime internally.
pub fn create_note_sync(
    instruction: impl AsRef<str>,
    config: &NoteConfig,
) -> Result<NoteOutput, NoteError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| NoteError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(create_note(instruction, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_named_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, NoteError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        NoteError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// The four-level fallback chain lets library users and CLI users each set
/// exactly as much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; we use it as-is. Useful in
///    tests or when the caller needs custom middleware.
///
/// 2. **Named provider + model** (`config.provider_name`) — the factory
///    reads the corresponding API key (`OPENAI_API_KEY`, etc.) from the
///    environment.
///
/// 3. **Environment pair** (`NOTE2NOTION_LLM_PROVIDER` + `NOTE2NOTION_MODEL`)
///    — both set means the execution environment (shell script, CI) chose;
///    checked before full auto-detection so the model choice is honoured
///    even when multiple API keys are present.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans all known API key variables and picks the first available
///    provider. Convenient for `note2notion "..."` with no other setup.
fn resolve_provider(config: &NoteConfig) -> Result<Arc<dyn LLMProvider>, NoteError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_named_provider(name, model);
    }

    // 3) Environment pair
    if let (Ok(prov), Ok(model)) = (
        std::env::var("NOTE2NOTION_LLM_PROVIDER"),
        std::env::var("NOTE2NOTION_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_named_provider(&prov, &model);
        }
    }

    // Prefer OpenAI explicitly when an OpenAI key is present, so users with
    // multiple provider keys get a deterministic default.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_named_provider("openai", model);
        }
    }

    // 4) Full auto-detection
    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| NoteError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY, or \
                configure a provider explicitly.\nError: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
