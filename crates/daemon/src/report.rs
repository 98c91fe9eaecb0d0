// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report extraction from streaming agent output.
//!
//! Agent children emit one JSON object per stdout line. The extractor is
//! deliberately tolerant: non-JSON lines (npm noise, partial writes) are
//! ignored, and the last assistant-message text seen wins.

use agx_core::AgentKind;
use serde_json::Value;

/// Extract the final assistant message from captured stdout.
///
/// Returns `None` when no message was observed or the last one is empty.
pub fn extract_report(log: &str, agent: AgentKind) -> Option<String> {
    let mut last: Option<String> = None;
    for line in log.lines() {
        let Ok(value) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if let Some(text) = message_text(&value, agent) {
            last = Some(text);
        }
    }
    last.filter(|text| !text.trim().is_empty())
}

fn message_text(value: &Value, agent: AgentKind) -> Option<String> {
    match agent {
        AgentKind::Claude => {
            if value.get("type")?.as_str()? != "assistant" {
                return None;
            }
            let content = value.get("message")?.get("content")?.as_array()?;
            let text: String = content
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("");
            Some(text)
        }
        AgentKind::Codex => {
            if value.get("type")?.as_str()? != "message" {
                return None;
            }
            match value.get("content")? {
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }
        }
        AgentKind::Gemini => {
            if value.get("type")?.as_str()? != "text" {
                return None;
            }
            Some(value.get("text")?.as_str()?.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
