//! CLI binary for note2notion.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `NoteConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use note2notion::pipeline::notion::build_page_payload;
use note2notion::{
    create_note, draft_note, markdown_to_blocks, publish_markdown, NoteConfig, NoteOutput,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Create a note from an instruction
  note2notion "note down the Q3 launch checklist we discussed"

  # Use a specific model
  note2notion --model gpt-4.1 --provider openai "summarise today's standup"

  # Publish existing markdown without touching the LLM
  note2notion --markdown-file notes.md --title "Meeting Notes"

  # Draft only: print the title and markdown, create nothing
  note2notion --draft-only "ideas for the offsite agenda"

  # Dry run: print the exact Notion request payload, no network calls
  note2notion --dry-run --markdown-file notes.md --title "Preview"

  # JSON output with page id, blocks, and stats
  note2notion --json "capture the migration plan" > result.json

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                       Input $/1M  Output $/1M
  ─────────    ──────────────────────────  ──────────  ───────────
  openai       gpt-4.1-nano (default)      $0.10       $0.40
  openai       gpt-4.1-mini                $0.40       $1.60
  openai       gpt-4.1                     $2.00       $8.00
  anthropic    claude-sonnet-4-20250514    $3.00       $15.00
  gemini       gemini-2.0-flash            $0.10       $0.40
  ollama       llama3.2, qwen2.5, …        free        free

ENVIRONMENT VARIABLES:
  NOTION_TOKEN             Notion internal integration token
  NOTION_PARENT_PAGE_ID    Page the new note is created under
  OPENAI_API_KEY           OpenAI API key
  ANTHROPIC_API_KEY        Anthropic API key
  GEMINI_API_KEY           Google Gemini API key
  NOTE2NOTION_LLM_PROVIDER Override provider (openai, anthropic, gemini, ollama)
  NOTE2NOTION_MODEL        Override model ID

SETUP:
  1. Create an internal integration at https://www.notion.so/my-integrations
  2. Share the target parent page with the integration
  3. export NOTION_TOKEN=ntn_...  NOTION_PARENT_PAGE_ID=...
  4. export OPENAI_API_KEY=sk-...
  5. note2notion "your first note"
"#;

/// Create structured Notion pages from free-text instructions.
#[derive(Parser, Debug)]
#[command(
    name = "note2notion",
    version,
    about = "Create structured Notion pages from free-text instructions",
    long_about = "Turn a one-line instruction into a full Notion page: an LLM drafts a titled \
markdown note, the note is converted to native Notion blocks (headings, lists, checkboxes, \
quotes, tables, code), and the page is created under your configured parent page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// The instruction to turn into a note. Omit with --markdown-file.
    instruction: Option<String>,

    /// Publish this markdown file instead of drafting via LLM.
    #[arg(long, value_name = "PATH")]
    markdown_file: Option<PathBuf>,

    /// Page title. Required with --markdown-file.
    #[arg(long)]
    title: Option<String>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "NOTE2NOTION_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "NOTE2NOTION_LLM_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Notion integration token.
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: Option<String>,

    /// Parent page id the note is created under.
    #[arg(long, env = "NOTION_PARENT_PAGE_ID")]
    parent_page: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "NOTE2NOTION_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Max LLM output tokens for the draft.
    #[arg(long, env = "NOTE2NOTION_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "NOTE2NOTION_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// Retries on transient LLM or Notion failures.
    #[arg(long, env = "NOTE2NOTION_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Per-API-call timeout in seconds.
    #[arg(long, env = "NOTE2NOTION_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Draft only: print the title and markdown, do not publish.
    #[arg(long, conflicts_with = "markdown_file")]
    draft_only: bool,

    /// Print the Notion request payload instead of creating the page.
    #[arg(long)]
    dry_run: bool,

    /// Output structured JSON (NoteOutput) instead of a summary.
    #[arg(long, env = "NOTE2NOTION_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "NOTE2NOTION_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NOTE2NOTION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "NOTE2NOTION_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    // ── Dry-run mode: convert and print, no network ──────────────────────
    if cli.dry_run {
        let markdown = match cli.markdown_file {
            Some(ref path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read markdown from {path:?}"))?,
            None => {
                // No markdown given: draft one first (LLM call, no Notion call).
                let instruction = require_instruction(&cli)?;
                let draft = draft_note(instruction, &config)
                    .await
                    .context("Drafting failed")?;
                if !cli.quiet {
                    eprintln!("{} {}", dim("title:"), bold(&draft.title));
                }
                draft.markdown
            }
        };
        let title = cli.title.as_deref().unwrap_or("(untitled)");
        let blocks = markdown_to_blocks(&markdown);
        let parent = cli.parent_page.as_deref().unwrap_or("<parent-page-id>");
        let payload = build_page_payload(parent, title, &blocks);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    // ── Draft-only mode: print the note, create nothing ──────────────────
    if cli.draft_only {
        let instruction = require_instruction(&cli)?;
        let spinner = show_progress.then(|| start_spinner("Drafting"));
        let draft = draft_note(instruction, &config).await;
        if let Some(ref s) = spinner {
            s.finish_and_clear();
        }
        let draft = draft.context("Drafting failed")?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&draft)?);
        } else {
            eprintln!("{} {}", green("✔"), bold(&draft.title));
            println!("{}", draft.markdown);
        }
        return Ok(());
    }

    // ── Full run ─────────────────────────────────────────────────────────
    let spinner = show_progress.then(|| start_spinner("Creating note"));
    let result = match cli.markdown_file {
        Some(ref path) => {
            let title = cli
                .title
                .clone()
                .context("--title is required with --markdown-file")?;
            let markdown = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read markdown from {path:?}"))?;
            publish_markdown(title, markdown, &config).await
        }
        None => {
            let instruction = require_instruction(&cli)?;
            create_note(instruction, &config).await
        }
    };
    if let Some(ref s) = spinner {
        s.finish_and_clear();
    }
    let output = result.context("Note creation failed")?;

    print_result(&cli, &output)?;
    Ok(())
}

fn require_instruction(cli: &Cli) -> Result<&str> {
    cli.instruction
        .as_deref()
        .context("An instruction is required (or use --markdown-file)")
}

fn start_spinner(prefix: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix(prefix.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_result(cli: &Cli, output: &NoteOutput) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    println!(
        "{} {}  →  {}",
        green("✔"),
        bold(&output.title),
        output.page_url
    );
    if !cli.quiet {
        eprintln!(
            "   {} blocks  {}ms total",
            dim(&output.stats.block_count.to_string()),
            output.stats.total_duration_ms
        );
        if output.stats.output_tokens > 0 {
            eprintln!(
                "   {} tokens in  /  {} tokens out",
                dim(&output.stats.input_tokens.to_string()),
                dim(&output.stats.output_tokens.to_string()),
            );
        }
    }
    io::stdout().flush().ok();
    Ok(())
}

/// Map CLI args to `NoteConfig`.
async fn build_config(cli: &Cli) -> Result<NoteConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {path:?}"))?,
        )
    } else {
        None
    };

    let mut builder = NoteConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref token) = cli.notion_token {
        builder = builder.notion_token(token.clone());
    }
    if let Some(ref parent) = cli.parent_page {
        builder = builder.notion_parent_page_id(parent.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
