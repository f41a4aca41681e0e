//! Post-processing: deterministic cleanup of LLM-generated note text.
//!
//! Models occasionally wrap their whole answer in a ` ```markdown ` fence
//! despite the prompt saying not to, emit Windows line endings, or sprinkle
//! invisible Unicode into the text. These passes repair those quirks before
//! the block converter runs, so the converter only has to deal with clean
//! newline-delimited markdown. Each pass is a pure `&str -> String`
//! function with no shared state and is independently testable.
//!
//! Order matters: the outer fence is stripped first so the wrapper marker
//! is not mistaken for a code block, and line endings are normalised
//! before per-line trimming.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup passes to raw LLM output.
pub fn clean_note_markdown(input: &str) -> String {
    let s = strip_outer_fence(input);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    trim_trailing_whitespace(&s)
}

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?\n(.*)\n```\s*$").unwrap());

/// Strip a single optional leading/trailing markdown code fence.
fn strip_outer_fence(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCE.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
