//! Error types for the note2notion library.
//!
//! The block converter itself is total — it never fails for any string
//! input — so every variant here belongs to a collaborator seam: the LLM
//! provider, the Notion API, or configuration. Messages carry remediation
//! hints so a CLI user can fix the problem without reading source code.

use thiserror::Error;

/// All errors returned by the note2notion library.
#[derive(Debug, Error)]
pub enum NoteError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Notion credentials are missing.
    #[error("Notion is not configured.\n{hint}")]
    NotionNotConfigured { hint: String },

    /// The configured LLM provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The LLM call failed after all retries.
    #[error("LLM call failed after {retries} retries: {detail}")]
    LlmFailed { retries: u32, detail: String },

    // ── Notion API errors ─────────────────────────────────────────────────
    /// Notion rejected the request with a non-retryable status.
    #[error("Notion API error (HTTP {status}): {message}")]
    NotionApiError { status: u16, message: String },

    /// Notion returned HTTP 429 even after backing off.
    ///
    /// Check `retry_after_secs` for a server-specified delay.
    #[error("Notion rate limit exceeded")]
    RateLimitExceeded { retry_after_secs: Option<u64> },

    /// Authentication failed (401/403) — retry will not help.
    #[error("Notion authentication error: {detail}\nCheck NOTION_TOKEN and that the integration is shared with the parent page.")]
    AuthError { detail: String },

    /// The API call timed out — the caller may retry.
    #[error("Notion API call timed out after {secs}s\nIncrease --api-timeout.")]
    ApiTimeout { secs: u64 },

    /// The request could not be sent at all (DNS, TLS, connection refused).
    #[error("Notion request failed: {reason}\nCheck your internet connection.")]
    RequestFailed { reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
