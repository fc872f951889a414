//! Turning model text into structured data.
//!
//! Models asked for JSON still wrap it in a markdown fence now and then, so the
//! fence is stripped before parsing. A parse failure is reported as
//! [`Failure::MalformedPayload`], distinct from transport failures.

use serde::de::DeserializeOwned;

use crate::retry::Failure;

const PREVIEW_CHARS: usize = 100;

/// Strips a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, plus surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag on the opening line.
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parses `text` as `T` after stripping code fences.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, Failure> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned).map_err(|e| Failure::MalformedPayload {
        message: format!("{e} (received: {:?})", preview(cleaned)),
    })
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
