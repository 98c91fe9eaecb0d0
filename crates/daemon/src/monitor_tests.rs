// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_core::AgentKind;
use agx_jobs::RunMeta;
use tempfile::TempDir;

fn store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    store.ensure_layout().unwrap();
    (dir, store)
}

fn running_meta(run_id: &str, pid: Option<u32>) -> RunMeta {
    let mut meta = RunMeta::new("nightly", run_id, AgentKind::Claude, "2026-03-14T09:00:00Z");
    meta.pid = pid;
    meta
}

#[test]
fn dead_pid_transitions_to_failed() {
    let (_dir, store) = store();
    // A pid that cannot exist
    let mut meta = running_meta("r1", Some(i32::MAX as u32));
    write_run_meta(&store, &meta).unwrap();
    // Give it a log with a final assistant message for salvage
    std::fs::write(
        store.run_dir("nightly", "r1").join("stdout.log"),
        r#"{"type":"assistant","message":{"content":[{"type":"text","text":"salvaged"}]}}"#,
    )
    .unwrap();

    let transitioned = monitor_running_jobs(&store, "2026-03-14T10:00:00Z");
    assert_eq!(transitioned, vec!["nightly/r1"]);

    meta = read_run_meta(&store, "nightly", "r1").unwrap();
    assert_eq!(meta.status, RunStatus::Failed);
    assert_eq!(meta.completed_at.as_deref(), Some("2026-03-14T10:00:00Z"));
    assert_eq!(
        std::fs::read_to_string(store.run_dir("nightly", "r1").join("report.md")).unwrap(),
        "salvaged"
    );
}

#[test]
fn live_pid_is_left_running() {
    let (_dir, store) = store();
    // Our own pid is definitely alive
    let meta = running_meta("r1", Some(std::process::id()));
    write_run_meta(&store, &meta).unwrap();

    assert!(monitor_running_jobs(&store, "t").is_empty());
    let meta = read_run_meta(&store, "nightly", "r1").unwrap();
    assert_eq!(meta.status, RunStatus::Running);
}

#[test]
fn pidless_running_record_is_left_for_next_tick() {
    let (_dir, store) = store();
    write_run_meta(&store, &running_meta("r1", None)).unwrap();
    assert!(monitor_running_jobs(&store, "t").is_empty());
}

#[test]
fn terminal_records_are_untouched() {
    let (_dir, store) = store();
    let mut meta = running_meta("r1", Some(i32::MAX as u32));
    meta.finish(RunStatus::Timeout, None, "t0");
    write_run_meta(&store, &meta).unwrap();

    assert!(monitor_running_jobs(&store, "t1").is_empty());
    let meta = read_run_meta(&store, "nightly", "r1").unwrap();
    assert_eq!(meta.status, RunStatus::Timeout);
    assert_eq!(meta.completed_at.as_deref(), Some("t0"));
}

#[test]
fn empty_runs_dir_is_fine() {
    let (_dir, store) = store();
    assert!(monitor_running_jobs(&store, "t").is_empty());
}
