// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg(unix)]

use super::*;
use tempfile::TempDir;

fn store_with_resources() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    store.ensure_layout().unwrap();
    std::fs::write(store.commands_dir().join("debug.md"), "Debug things\n").unwrap();
    std::fs::create_dir_all(store.skills_dir().join("review")).unwrap();
    std::fs::write(store.skills_dir().join("review/SKILL.md"), "review").unwrap();
    std::fs::write(store.hooks_dir().join("pre.sh"), "#!/bin/sh\n").unwrap();
    std::fs::write(store.memory_dir().join("AGENTS.md"), "shared memory").unwrap();
    std::fs::write(store.memory_dir().join("notes.md"), "extra").unwrap();
    (dir, store)
}

#[test]
fn markdown_agent_gets_symlinked_commands() {
    let (_dir, store) = store_with_resources();
    sync_resources_to_version(&store, AgentKind::Claude, "1.0.0").unwrap();

    let config = store
        .version_dir(AgentKind::Claude, "1.0.0")
        .join("home/.claude");
    let commands = config.join("commands");
    assert!(commands
        .symlink_metadata()
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(
        std::fs::read_to_string(commands.join("debug.md")).unwrap(),
        "Debug things\n"
    );
    assert!(config.join("skills").symlink_metadata().is_ok());
    assert!(config.join("hooks").symlink_metadata().is_ok());
}

#[test]
fn toml_agent_gets_converted_commands() {
    let (_dir, store) = store_with_resources();
    sync_resources_to_version(&store, AgentKind::Codex, "0.9.0").unwrap();

    let prompts = store
        .version_dir(AgentKind::Codex, "0.9.0")
        .join("home/.codex/prompts");
    // A real directory, not a symlink
    assert!(!prompts.symlink_metadata().unwrap().file_type().is_symlink());
    let toml = std::fs::read_to_string(prompts.join("debug.toml")).unwrap();
    assert!(toml.contains("name = \"debug\""));
    assert!(toml.contains("prompt = \"Debug things\""));
}

#[test]
fn shared_memory_takes_agent_instructions_name() {
    let (_dir, store) = store_with_resources();
    sync_resources_to_version(&store, AgentKind::Claude, "1.0.0").unwrap();

    let config = store
        .version_dir(AgentKind::Claude, "1.0.0")
        .join("home/.claude");
    assert_eq!(
        std::fs::read_to_string(config.join("CLAUDE.md")).unwrap(),
        "shared memory"
    );
    // Non-default memory files keep their own names
    assert_eq!(
        std::fs::read_to_string(config.join("notes.md")).unwrap(),
        "extra"
    );
    // The shared name is not duplicated alongside the rename
    assert!(!config.join("AGENTS.md").exists());
}

#[test]
fn agents_whose_instructions_file_is_the_shared_name_keep_it() {
    let (_dir, store) = store_with_resources();
    sync_resources_to_version(&store, AgentKind::Codex, "0.9.0").unwrap();
    let config = store
        .version_dir(AgentKind::Codex, "0.9.0")
        .join("home/.codex");
    assert_eq!(
        std::fs::read_to_string(config.join("AGENTS.md")).unwrap(),
        "shared memory"
    );
}

#[test]
fn resync_replaces_stale_entries() {
    let (_dir, store) = store_with_resources();
    let config = store
        .version_dir(AgentKind::Claude, "1.0.0")
        .join("home/.claude");
    // A stale plain directory where the symlink should go
    std::fs::create_dir_all(config.join("commands")).unwrap();
    std::fs::write(config.join("commands/stale.md"), "old").unwrap();

    sync_resources_to_version(&store, AgentKind::Claude, "1.0.0").unwrap();

    let commands = config.join("commands");
    assert!(commands
        .symlink_metadata()
        .unwrap()
        .file_type()
        .is_symlink());
    assert!(!commands.join("stale.md").exists());
    assert!(commands.join("debug.md").exists());
}

#[test]
fn missing_central_dirs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    // No ensure_layout: central dirs absent
    sync_resources_to_version(&store, AgentKind::Claude, "1.0.0").unwrap();
    let config = store
        .version_dir(AgentKind::Claude, "1.0.0")
        .join("home/.claude");
    assert!(config.is_dir());
    assert!(!config.join("commands").exists());
}
