//! Configuration types for note creation.
//!
//! All behaviour is controlled through [`NoteConfig`], built via its
//! [`NoteConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across threads and to diff two runs when their outputs
//! differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::NoteError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Notion API version header sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Configuration for creating a note.
///
/// Built via [`NoteConfig::builder()`] or [`NoteConfig::default()`].
///
/// # Example
/// ```rust
/// use note2notion::NoteConfig;
///
/// let config = NoteConfig::builder()
///     .model("gpt-4.1-nano")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct NoteConfig {
    /// Notion integration token. If None, read from `NOTION_TOKEN`.
    pub notion_token: Option<String>,

    /// Parent page the new page is created under. If None, read from
    /// `NOTION_PARENT_PAGE_ID`. The integration must be shared with it.
    pub notion_parent_page_id: Option<String>,

    /// `Notion-Version` header value. Default: [`DEFAULT_NOTION_VERSION`].
    pub notion_version: String,

    /// LLM model identifier, e.g. "gpt-4.1-nano", "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the draft completion. Default: 0.4.
    ///
    /// Note drafting benefits from a little creativity — the model expands
    /// a terse instruction into useful content — but higher values drift
    /// away from what the user actually asked for.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate for the draft. Default: 2048.
    ///
    /// Setting this too low silently truncates the note mid-sentence;
    /// 2048 covers multi-section notes with tables and code comfortably.
    pub max_tokens: usize,

    /// Maximum retry attempts on a transient API failure. Default: 3.
    ///
    /// Most 5xx and timeout errors are transient. Permanent errors (bad
    /// API key, 400) are not retried and surface immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Per-API-call timeout in seconds (LLM and Notion). Default: 60.
    pub api_timeout_secs: u64,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            notion_parent_page_id: None,
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.4,
            max_tokens: 2048,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
            system_prompt: None,
        }
    }
}

impl fmt::Debug for NoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteConfig")
            .field("notion_token", &self.notion_token.as_ref().map(|_| "<redacted>"))
            .field("notion_parent_page_id", &self.notion_parent_page_id)
            .field("notion_version", &self.notion_version)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl NoteConfig {
    /// Create a new builder for `NoteConfig`.
    pub fn builder() -> NoteConfigBuilder {
        NoteConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NoteConfig`].
#[derive(Debug)]
pub struct NoteConfigBuilder {
    config: NoteConfig,
}

impl NoteConfigBuilder {
    pub fn notion_token(mut self, token: impl Into<String>) -> Self {
        self.config.notion_token = Some(token.into());
        self
    }

    pub fn notion_parent_page_id(mut self, id: impl Into<String>) -> Self {
        self.config.notion_parent_page_id = Some(id.into());
        self
    }

    pub fn notion_version(mut self, version: impl Into<String>) -> Self {
        self.config.notion_version = version.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NoteConfig, NoteError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(NoteError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.notion_version.trim().is_empty() {
            return Err(NoteError::InvalidConfig(
                "notion_version must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
