// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn fixture_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "agents.yaml", "agents:\n  claude: 1.0.0\n");
    write(root, "shared/commands/debug.md", "Debug.\n");
    write(
        root,
        "shared/commands/review.md",
        "---\ndescription: Review changes\n---\nReview.\n",
    );
    // codex override of the shared name plus its own command
    write(root, "codex/prompts/debug.md", "Codex debug.\n");
    write(root, "codex/prompts/codex-only.md", "Only codex.\n");
    write(
        root,
        "skills/refactor/SKILL.md",
        "---\ndescription: Refactoring\nauthor: alice\nkeywords: [clean]\n---\nBody\n",
    );
    write(root, "skills/refactor/rules/one.md", "r1");
    write(root, "skills/refactor/rules/two.md", "r2");
    write(root, "hooks/pre-commit.sh", "#!/bin/sh\n");
    write(root, "claude/hooks/on-stop.sh", "#!/bin/sh\n");
    write(root, "memory/AGENTS.md", "Shared.\n");
    write(root, "memory/CLAUDE.md", "Claude only.\n");
    write(
        root,
        "jobs/nightly.yml",
        "name: nightly\nschedule: \"0 3 * * *\"\nagent: claude\nprompt: p\n",
    );
    write(root, "drives/api.md", "---\nname: api\nupdated: x\n---\n# API\n");
    write(root, "drives/platform/overview.md", "# Platform\n");
    dir
}

#[test]
fn discovers_every_category() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    assert_eq!(d.commands.len(), 4);
    assert_eq!(d.skills.len(), 1);
    assert_eq!(d.hooks.len(), 2);
    assert_eq!(d.memory.len(), 2);
    assert_eq!(d.jobs.len(), 1);
    assert_eq!(d.drives.len(), 2);
    assert!(d.manifest.is_some());
}

#[test]
fn display_lists_shared_first_without_duplicates() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    let names: Vec<(&str, Option<AgentKind>)> = d
        .commands_for_display()
        .iter()
        .map(|c| (c.name.as_str(), c.agent))
        .collect();
    assert_eq!(
        names,
        vec![
            ("debug", None),
            ("review", None),
            ("codex-only", Some(AgentKind::Codex)),
        ]
    );
}

#[test]
fn override_rule_resolves_per_agent() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    // codex gets its own debug.md
    let codex = d.command_source("debug", AgentKind::Codex).unwrap();
    assert_eq!(codex.agent, Some(AgentKind::Codex));
    // claude falls back to shared
    let claude = d.command_source("debug", AgentKind::Claude).unwrap();
    assert_eq!(claude.agent, None);
    assert!(d.command_source("missing", AgentKind::Claude).is_none());
}

#[test]
fn command_descriptions_come_from_front_matter() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    let review = d
        .commands
        .iter()
        .find(|c| c.name == "review")
        .unwrap();
    assert_eq!(review.description.as_deref(), Some("Review changes"));
}

#[test]
fn empty_command_is_flagged_invalid() {
    let repo = fixture_repo();
    write(repo.path(), "shared/commands/empty.md", "  \n");
    let d = discover(repo.path()).unwrap();
    let empty = d.commands.iter().find(|c| c.name == "empty").unwrap();
    assert!(empty.invalid.is_some());
}

#[test]
fn skill_metadata_and_rule_count() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    let skill = &d.skills[0];
    assert_eq!(skill.name, "refactor");
    assert_eq!(skill.meta.description.as_deref(), Some("Refactoring"));
    assert_eq!(skill.meta.author.as_deref(), Some("alice"));
    assert_eq!(skill.meta.keywords, vec!["clean"]);
    assert_eq!(skill.rule_count, 2);
}

#[test]
fn memory_maps_instruction_files_to_agents() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    let shared = d.memory.iter().find(|m| m.file_name == "AGENTS.md").unwrap();
    assert_eq!(shared.agent, None);
    let claude = d.memory.iter().find(|m| m.file_name == "CLAUDE.md").unwrap();
    assert_eq!(claude.agent, Some(AgentKind::Claude));
}

#[test]
fn hooks_carry_agent_scope() {
    let repo = fixture_repo();
    let d = discover(repo.path()).unwrap();
    assert!(d.hooks.iter().any(|h| h.agent.is_none()));
    assert!(d
        .hooks
        .iter()
        .any(|h| h.agent == Some(AgentKind::Claude) && h.name == "on-stop.sh"));
}

#[test]
fn empty_repo_discovers_nothing() {
    let dir = TempDir::new().unwrap();
    let d = discover(dir.path()).unwrap();
    assert!(d.commands.is_empty());
    assert!(d.manifest.is_none());
}
