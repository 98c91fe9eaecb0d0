// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown command → TOML prompt conversion for TOML-format agents.
//!
//! A markdown command file optionally opens with YAML front matter carrying
//! a `description`; the body becomes the prompt text.

use toml::Value;

/// Convert a markdown command into the TOML prompt format.
///
/// Front matter keys become top-level TOML keys (only `description` and
/// `argument-hint` are recognized); the remaining markdown becomes the
/// multi-line `prompt` value. The result is deterministic for a given
/// input, which the sync classifier relies on.
pub fn markdown_to_toml(name: &str, markdown: &str) -> String {
    let (front, body) = split_front_matter(markdown);

    let mut doc = toml::map::Map::new();
    doc.insert("name".to_string(), Value::String(name.to_string()));
    if let Some(front) = front {
        for line in front.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key == "description" || key == "argument-hint" {
                doc.insert(
                    key.to_string(),
                    Value::String(value.trim().trim_matches('"').to_string()),
                );
            }
        }
    }
    doc.insert(
        "prompt".to_string(),
        Value::String(body.trim().to_string()),
    );

    // toml::to_string on a Map keyed this way is infallible in practice,
    // but the lint policy wants the error path handled.
    toml::to_string(&Value::Table(doc)).unwrap_or_default()
}

/// Split leading `---` YAML front matter from a markdown document.
/// Returns (front matter without fences, body).
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---\n") else {
        return (None, content);
    };
    match rest.split_once("\n---") {
        Some((front, body)) => {
            let body = body.strip_prefix('\n').unwrap_or(body);
            (Some(front), body)
        }
        None => (None, content),
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
