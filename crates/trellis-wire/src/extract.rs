//! Best-effort reasoning extraction from partially-streamed JSON

use std::sync::LazyLock;

use regex::Regex;

/// Matches the `"reasoning"` string value. The closing quote is optional so
/// a payload truncated mid-value still yields everything streamed so far.
static REASONING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""reasoning"\s*:\s*"((?:\\.|[^"\\])*)"?"#).unwrap());

/// Extract human-readable reasoning text from an in-progress agent payload.
///
/// The payload is expected to eventually be a JSON object with a
/// `"reasoning"` field, but is observed as a growing prefix while tokens
/// stream in. Total: never panics, and output grows monotonically once the
/// reasoning value starts streaming.
pub fn extract_reasoning(raw: &str) -> String {
    let cleaned = strip_fences(raw);

    if cleaned.starts_with('{') {
        if let Some(caps) = REASONING_PATTERN.captures(cleaned) {
            return unescape(&caps[1]);
        }
    }

    // Plain-reasoning fallback for non-JSON agent replies.
    cleaned.to_string()
}

/// Strip Markdown code-fence markers, whether or not the fence is closed.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    for marker in ["```json", "```"] {
        if let Some(rest) = text.strip_prefix(marker) {
            text = rest.trim_start();
            break;
        }
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Unescape the JSON string escapes that appear in streamed reasoning.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            // Unknown escape: keep it verbatim rather than guessing.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
