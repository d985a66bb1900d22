//! Tool-call normalization.
//!
//! Models surface tool calls in one of two shapes: native structured
//! `tool_calls` on the assistant message, or — for backends without native
//! tool calling that were instructed via the prompt — a plain-text reply that
//! is itself a JSON object with a `tools` array of `{name, arguments}`
//! entries. This module collapses both into one canonical
//! [`ToolCallRequest`] list immediately after each model response, so the
//! round-execution loop is written once against the canonical shape.
//!
//! Calls recovered from plain text carry no id; result correlation in that
//! mode is positional by tool name. This is a known limitation of the
//! fallback convention, not something an id scheme is invented for.

use serde_json::Value;

use crate::protocol::ToolCallRequest;

/// Produce the canonical tool-call list for one model reply. Native calls
/// win; otherwise the content is probed for the plain-text convention.
pub fn normalize_tool_calls(content: &str, native: Vec<ToolCallRequest>) -> Vec<ToolCallRequest> {
    if !native.is_empty() {
        return native;
    }
    extract_from_text(content)
}

fn extract_from_text(content: &str) -> Vec<ToolCallRequest> {
    let value: Value = match serde_json::from_str(content.trim()) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let entries = match value.get("tools").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?;
            let arguments = match entry.get("arguments") {
                Some(Value::Object(map)) => {
                    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
                }
                _ => "{}".to_string(),
            };
            Some(ToolCallRequest::new("", name, arguments))
        })
        .collect()
}
