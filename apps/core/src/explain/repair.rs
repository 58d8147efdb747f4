//! Best-effort cleanup of model output before JSON parsing.
//!
//! Long completions are often cut off mid-document. The repair here is
//! purely structural: it counts delimiters and appends closers. It ignores
//! delimiters inside string literals and never reorders anything, so the
//! result is not guaranteed to parse.

use regex::Regex;
use std::sync::LazyLock;

// expect() is acceptable for a literal pattern compiled once.
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("Invalid regex: code fence pattern"));

/// Removes Markdown code fences (with or without a `json` tag) and trims.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Closes an unterminated string, then open arrays, then open objects.
///
/// Text that already parses as JSON is returned unchanged.
pub fn repair_json(text: &str) -> String {
    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return text.to_string();
    }

    let mut repaired = text.to_string();

    if text.matches('"').count() % 2 != 0 {
        repaired.push('"');
    }

    let open_brackets = text.matches('[').count().saturating_sub(text.matches(']').count());
    repaired.push_str(&"]".repeat(open_brackets));

    let open_braces = text.matches('{').count().saturating_sub(text.matches('}').count());
    repaired.push_str(&"}".repeat(open_braces));

    repaired
}
