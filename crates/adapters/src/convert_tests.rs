// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn body_only_command() {
    let out = markdown_to_toml("debug", "Run the debugger.\n");
    assert!(out.contains("name = \"debug\""));
    assert!(out.contains("prompt = \"Run the debugger.\""));
}

#[test]
fn front_matter_description_is_lifted() {
    let md = "---\ndescription: Debug helper\n---\n\nRun the debugger.\n";
    let out = markdown_to_toml("debug", md);
    assert!(out.contains("description = \"Debug helper\""));
    assert!(out.contains("prompt = \"Run the debugger.\""));
    assert!(!out.contains("---"));
}

#[test]
fn unknown_front_matter_keys_are_dropped() {
    let md = "---\ndescription: x\nauthor: someone\n---\nbody\n";
    let out = markdown_to_toml("c", md);
    assert!(!out.contains("author"));
}

#[test]
fn conversion_is_deterministic() {
    let md = "---\ndescription: d\n---\nbody text\n";
    assert_eq!(markdown_to_toml("x", md), markdown_to_toml("x", md));
}

#[test]
fn multiline_prompt_survives() {
    let out = markdown_to_toml("c", "line one\n\nline two\n");
    let parsed: toml::Value = toml::from_str(&out).unwrap();
    assert_eq!(
        parsed.get("prompt").and_then(|v| v.as_str()),
        Some("line one\n\nline two")
    );
}

#[test]
fn split_front_matter_without_fences() {
    let (front, body) = split_front_matter("plain body");
    assert!(front.is_none());
    assert_eq!(body, "plain body");
}

#[test]
fn split_unterminated_front_matter_is_body() {
    let (front, body) = split_front_matter("---\ndescription: x\nno close");
    assert!(front.is_none());
    assert!(body.contains("description"));
}
