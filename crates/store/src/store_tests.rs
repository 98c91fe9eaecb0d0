// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_core::{SYSTEM_SLOT, USER_SLOT};
use tempfile::TempDir;

fn store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("agents-home"));
    (dir, store)
}

fn record(priority: u32, readonly: bool) -> RepoRecord {
    RepoRecord::builder()
        .priority(priority)
        .readonly(readonly)
        .build()
}

#[test]
fn read_meta_on_fresh_store_is_default() {
    let (_dir, store) = store();
    assert_eq!(store.read_meta(), Meta::default());
}

#[test]
fn ensure_layout_creates_all_dirs() {
    let (_dir, store) = store();
    store.ensure_layout().unwrap();
    for dir in LAYOUT_DIRS {
        assert!(store.home().join(dir).is_dir(), "{dir} missing");
    }
}

#[test]
fn ensure_layout_is_idempotent() {
    let (_dir, store) = store();
    store.ensure_layout().unwrap();
    store.ensure_layout().unwrap();
}

#[test]
fn meta_round_trips() {
    let (_dir, store) = store();
    let mut meta = Meta::default();
    meta.agents.insert(AgentKind::Claude, "1.0.0".into());
    store.write_meta(&meta).unwrap();
    assert_eq!(store.read_meta(), meta);
}

#[test]
fn meta_file_carries_header_comment() {
    let (_dir, store) = store();
    store.write_meta(&Meta::default()).unwrap();
    let content = std::fs::read_to_string(store.meta_path()).unwrap();
    assert!(content.starts_with("# agx metadata"));
}

#[test]
fn write_leaves_no_temp_file() {
    let (_dir, store) = store();
    store.write_meta(&Meta::default()).unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(store.home())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_meta_yields_default() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.home()).unwrap();
    std::fs::write(store.meta_path(), ": not yaml [").unwrap();
    assert_eq!(store.read_meta(), Meta::default());
}

#[test]
fn set_and_get_repo() {
    let (_dir, store) = store();
    store.set_repo(USER_SLOT, record(10, false)).unwrap();
    assert!(store.get_repo(USER_SLOT).is_some());
    assert!(store.get_repo(SYSTEM_SLOT).is_none());
}

#[test]
fn readonly_slot_rejects_writes() {
    let (_dir, store) = store();
    store
        .set_repo_unchecked(SYSTEM_SLOT, record(0, true))
        .unwrap();
    let err = store.set_repo(SYSTEM_SLOT, record(0, false)).unwrap_err();
    assert!(matches!(err, StoreError::ReadonlySlot(_)));
    // The unchecked path still works (bootstrap/migration)
    store
        .set_repo_unchecked(SYSTEM_SLOT, record(0, true))
        .unwrap();
}

#[test]
fn remove_repo_returns_removed() {
    let (_dir, store) = store();
    store.set_repo(USER_SLOT, record(10, false)).unwrap();
    assert!(store.remove_repo(USER_SLOT).unwrap().is_some());
    assert!(store.remove_repo(USER_SLOT).unwrap().is_none());
}

#[test]
fn repos_by_priority_ascending() {
    let (_dir, store) = store();
    store.set_repo("project", record(100, false)).unwrap();
    store.set_repo_unchecked(SYSTEM_SLOT, record(0, true)).unwrap();
    store.set_repo(USER_SLOT, record(10, false)).unwrap();
    let names: Vec<String> = store
        .repos_by_priority()
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, vec!["system", "user", "project"]);
    let (top, _) = store.highest_priority_repo().unwrap();
    assert_eq!(top, "project");
}

#[test]
fn instructions_dir_migrates_to_memory() {
    let (_dir, store) = store();
    store.ensure_layout().unwrap();
    let legacy = store.home().join("instructions");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(legacy.join("AGENTS.md"), "old shared").unwrap();
    std::fs::write(legacy.join("CLAUDE.md"), "old claude").unwrap();
    // A collision: memory already has this name and must win
    std::fs::write(store.memory_dir().join("CLAUDE.md"), "current").unwrap();

    store.ensure_layout().unwrap();

    assert!(!legacy.exists());
    assert_eq!(
        std::fs::read_to_string(store.memory_dir().join("AGENTS.md")).unwrap(),
        "old shared"
    );
    assert_eq!(
        std::fs::read_to_string(store.memory_dir().join("CLAUDE.md")).unwrap(),
        "current"
    );
}

#[test]
fn run_dir_layout() {
    let (_dir, store) = store();
    let run = store.run_dir("nightly", "2026-01-01T00-00-00-000Z");
    assert!(run.ends_with("runs/nightly/2026-01-01T00-00-00-000Z"));
}
