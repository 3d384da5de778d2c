//! Post-LLM output cleanup.
//!
//! Strips reasoning blocks some models emit before the answer and rejects
//! responses that are empty once cleaned.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CompletionRequest, LlmClient};
use super::LlmError;

static THINK_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

/// Strip model artifacts from raw output.
///
/// Handles:
/// 1. Closed `<think>...</think>` blocks anywhere in the text
/// 2. An unclosed `<think>` opener (everything after it is reasoning)
/// 3. Leading/trailing whitespace left over from stripping
pub fn sanitize_llm_output(raw: &str) -> String {
    let mut text = THINK_BLOCK_RE.replace_all(raw, "").to_string();

    if let Some(idx) = text.find("<think>") {
        text.truncate(idx);
    }

    text.trim().to_string()
}

/// Call the client and return sanitized, non-empty text.
pub fn complete_sanitized(
    llm: &dyn LlmClient,
    request: &CompletionRequest,
) -> Result<String, LlmError> {
    let raw = llm.complete(request)?;
    let text = sanitize_llm_output(&raw);
    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}
