// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const FULL: &str = r#"
agents:
  claude: 1.2.3
  codex: latest

mcp:
  github:
    command: gh-mcp
    args: ["--stdio"]
    scope: user
    agents: [claude, codex]
    env:
      GH_TOKEN: xyz
  docs:
    url: https://docs.example.com/mcp
    scope: project

defaults:
  method: copy
  scope: global
  agents: [claude]

drives:
  api:
    description: API design notes
    project: ~/code/api
"#;

#[test]
fn parse_full_manifest() {
    let m: Manifest = serde_yaml::from_str(FULL).unwrap();
    assert_eq!(m.agents.get(&AgentKind::Claude).map(String::as_str), Some("1.2.3"));
    assert_eq!(m.mcp.len(), 2);
    let github = &m.mcp["github"];
    assert!(github.transport.is_stdio());
    assert_eq!(github.agents, vec![AgentKind::Claude, AgentKind::Codex]);
    assert_eq!(github.env.get("GH_TOKEN").map(String::as_str), Some("xyz"));
    let docs = &m.mcp["docs"];
    assert!(!docs.transport.is_stdio());
    assert_eq!(docs.scope, McpScope::Project);
    assert_eq!(m.defaults.as_ref().unwrap().method, SyncMethod::Copy);
    assert_eq!(
        m.drives["api"].project.as_deref(),
        Some("~/code/api")
    );
}

#[test]
fn stdio_requires_command_http_requires_url() {
    let bad = "mcp:\n  broken:\n    scope: user\n";
    assert!(serde_yaml::from_str::<Manifest>(bad).is_err());
}

#[test]
fn empty_manifest_parses() {
    let m: Manifest = serde_yaml::from_str("{}").unwrap();
    assert!(m.agents.is_empty());
    assert!(m.mcp.is_empty());
    assert!(m.defaults.is_none());
}

#[test]
fn manifest_round_trip() {
    let m: Manifest = serde_yaml::from_str(FULL).unwrap();
    let yaml = serde_yaml::to_string(&m).unwrap();
    let back: Manifest = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(m, back);
}

#[test]
fn find_walks_upward() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let nested = root.join("a/b/c");
    std::fs::create_dir_all(&nested).unwrap();
    let agents_dir = root.join(PROJECT_MANIFEST_DIR);
    std::fs::create_dir_all(&agents_dir).unwrap();
    std::fs::write(
        agents_dir.join(REPO_MANIFEST_NAME),
        "agents:\n  claude: 2.0.0\n",
    )
    .unwrap();

    let (found_root, manifest) = find_project_manifest(&nested).unwrap().unwrap();
    assert_eq!(found_root, root);
    assert_eq!(
        manifest.agents.get(&AgentKind::Claude).map(String::as_str),
        Some("2.0.0")
    );
}

#[test]
fn find_absent_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(find_project_manifest(dir.path()).unwrap().is_none());
}

#[test]
fn load_from_repo_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Manifest::load_from_repo(dir.path()).unwrap().is_none());
}
