// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_core::AgentKind;

#[test]
fn modern_yaml_passes_through() {
    let yaml = "agents:\n  claude: 1.0.0\n";
    let (meta, migrated) = parse_meta_yaml(yaml).unwrap();
    assert!(!migrated);
    assert_eq!(
        meta.agents.get(&AgentKind::Claude).map(String::as_str),
        Some("1.0.0")
    );
}

#[test]
fn empty_file_is_default() {
    let (meta, migrated) = parse_meta_yaml("").unwrap();
    assert!(!migrated);
    assert_eq!(meta, Meta::default());
}

#[test]
fn scopes_renames_to_repos() {
    let yaml = r#"
scopes:
  user:
    source: gh:alice/cfg
    branch: main
    priority: 10
"#;
    let (meta, migrated) = parse_meta_yaml(yaml).unwrap();
    assert!(migrated);
    let rec = meta.repos.get("user").unwrap();
    assert_eq!(rec.source, "gh:alice/cfg");
}

#[test]
fn versions_default_flattens_to_agents() {
    let yaml = r#"
versions:
  claude:
    default: 1.2.3
    installed: [1.2.3, 1.1.0]
  codex:
    default: 0.9.0
"#;
    let (meta, migrated) = parse_meta_yaml(yaml).unwrap();
    assert!(migrated);
    assert_eq!(
        meta.agents.get(&AgentKind::Claude).map(String::as_str),
        Some("1.2.3")
    );
    assert_eq!(
        meta.agents.get(&AgentKind::Codex).map(String::as_str),
        Some("0.9.0")
    );
}

#[test]
fn both_legacy_keys_migrate_together() {
    let yaml = r#"
scopes:
  user:
    source: gh:alice/cfg
    branch: main
    priority: 10
versions:
  gemini:
    default: 2.0.0
"#;
    let (meta, migrated) = parse_meta_yaml(yaml).unwrap();
    assert!(migrated);
    assert!(meta.repos.contains_key("user"));
    assert_eq!(
        meta.agents.get(&AgentKind::Gemini).map(String::as_str),
        Some("2.0.0")
    );
}

#[test]
fn legacy_state_json_synthesizes_user_repo() {
    let json = r#"{"repo": "gh:alice/cfg", "branch": "dev", "commit": "abc1234"}"#;
    let meta = from_legacy_state_json(json).unwrap();
    let rec = meta.repos.get("user").unwrap();
    assert_eq!(rec.source, "gh:alice/cfg");
    assert_eq!(rec.branch, "dev");
    assert_eq!(rec.commit, "abc1234");
    assert_eq!(rec.priority, 10);
    assert!(!rec.readonly);
}

#[test]
fn legacy_state_json_without_repo_is_none() {
    assert!(from_legacy_state_json(r#"{"other": 1}"#).is_none());
    assert!(from_legacy_state_json("not json").is_none());
}
