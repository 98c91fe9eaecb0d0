// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::discover::discover;
use agx_store::Store;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup() -> (TempDir, Store, TempDir) {
    let home = TempDir::new().unwrap();
    let store = Store::at(home.path().join("agents-home"));
    store.ensure_layout().unwrap();
    let repo = TempDir::new().unwrap();
    (home, store, repo)
}

#[test]
fn commands_install_centrally_as_markdown() {
    let (_home, store, repo) = setup();
    write(repo.path(), "codex/prompts/debug.md", "Codex debug.\n");
    let d = discover(repo.path()).unwrap();
    install_command(&store, &d.commands[0]).unwrap();
    // Central storage stays markdown even for a TOML-format agent's command
    assert_eq!(
        std::fs::read_to_string(store.commands_dir().join("debug.md")).unwrap(),
        "Codex debug.\n"
    );
}

#[test]
fn invalid_command_install_fails() {
    let (_home, store, repo) = setup();
    write(repo.path(), "shared/commands/empty.md", " \n");
    let d = discover(repo.path()).unwrap();
    assert!(install_command(&store, &d.commands[0]).is_err());
}

#[test]
fn skills_install_with_rules() {
    let (_home, store, repo) = setup();
    write(repo.path(), "skills/refactor/SKILL.md", "---\ndescription: d\n---\n");
    write(repo.path(), "skills/refactor/rules/one.md", "r1");
    let d = discover(repo.path()).unwrap();
    install_skill(&store, &d.skills[0]).unwrap();
    assert!(store.skills_dir().join("refactor/SKILL.md").is_file());
    assert!(store.skills_dir().join("refactor/rules/one.md").is_file());
}

#[test]
fn reinstalling_a_skill_replaces_it() {
    let (_home, store, repo) = setup();
    write(repo.path(), "skills/refactor/SKILL.md", "new");
    std::fs::create_dir_all(store.skills_dir().join("refactor")).unwrap();
    std::fs::write(store.skills_dir().join("refactor/stale.md"), "old").unwrap();
    let d = discover(repo.path()).unwrap();
    install_skill(&store, &d.skills[0]).unwrap();
    assert!(!store.skills_dir().join("refactor/stale.md").exists());
}

#[test]
fn hooks_install_flat() {
    let (_home, store, repo) = setup();
    write(repo.path(), "claude/hooks/on-stop.sh", "#!/bin/sh\n");
    let d = discover(repo.path()).unwrap();
    install_hook(&store, &d.hooks[0]).unwrap();
    assert!(store.hooks_dir().join("on-stop.sh").is_file());
}

#[test]
fn memory_keeps_central_names() {
    let (_home, store, repo) = setup();
    write(repo.path(), "memory/AGENTS.md", "shared\n");
    let d = discover(repo.path()).unwrap();
    install_memory(&store, &d.memory[0]).unwrap();
    assert!(store.memory_dir().join("AGENTS.md").is_file());
}

#[test]
fn valid_job_installs_as_yml() {
    let (_home, store, repo) = setup();
    write(
        repo.path(),
        "jobs/nightly.yaml",
        "name: nightly\nschedule: \"0 3 * * *\"\nagent: claude\nprompt: p\n",
    );
    let d = discover(repo.path()).unwrap();
    let spec = install_job(&store, &d.jobs[0]).unwrap();
    assert_eq!(spec.name, "nightly");
    assert!(store.jobs_dir().join("nightly.yml").is_file());
}

#[test]
fn invalid_job_is_rejected() {
    let (_home, store, repo) = setup();
    write(
        repo.path(),
        "jobs/bad.yml",
        "name: bad\nschedule: nope\nagent: claude\nprompt: p\n",
    );
    let d = discover(repo.path()).unwrap();
    assert!(install_job(&store, &d.jobs[0]).is_err());
    assert!(!store.jobs_dir().join("bad.yml").exists());
}
