// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    store.ensure_layout().unwrap();
    (dir, store)
}

fn meta(run_id: &str) -> RunMeta {
    RunMeta::new("nightly", run_id, AgentKind::Claude, "2026-03-14T09:00:00Z")
}

#[test]
fn write_then_read_round_trips() {
    let (_dir, store) = store();
    let mut m = meta("2026-03-14T09-00-00-000Z");
    m.pid = Some(4242);
    write_run_meta(&store, &m).unwrap();
    let back = read_run_meta(&store, "nightly", "2026-03-14T09-00-00-000Z").unwrap();
    assert_eq!(back, m);
}

#[test]
fn finish_sets_terminal_fields() {
    let mut m = meta("r1");
    assert!(m.finish(RunStatus::Completed, Some(0), "2026-03-14T09:05:00Z"));
    assert_eq!(m.status, RunStatus::Completed);
    assert_eq!(m.exit_code, Some(0));
    assert_eq!(m.completed_at.as_deref(), Some("2026-03-14T09:05:00Z"));
}

#[test]
fn terminal_records_never_change() {
    let mut m = meta("r1");
    m.finish(RunStatus::Timeout, None, "t1");
    assert!(!m.finish(RunStatus::Completed, Some(0), "t2"));
    assert_eq!(m.status, RunStatus::Timeout);
    assert_eq!(m.completed_at.as_deref(), Some("t1"));
}

#[test]
fn finish_rejects_running_as_target() {
    let mut m = meta("r1");
    assert!(!m.finish(RunStatus::Running, None, "t"));
    assert_eq!(m.status, RunStatus::Running);
}

#[test]
fn run_ids_list_chronologically() {
    let (_dir, store) = store();
    for id in [
        "2026-03-14T10-00-00-000Z",
        "2026-03-13T09-00-00-000Z",
        "2026-03-14T09-30-00-000Z",
    ] {
        write_run_meta(&store, &meta(id)).unwrap();
    }
    let ids = list_run_ids(&store, "nightly");
    assert_eq!(
        ids,
        vec![
            "2026-03-13T09-00-00-000Z",
            "2026-03-14T09-30-00-000Z",
            "2026-03-14T10-00-00-000Z",
        ]
    );
}

#[test]
fn latest_report_prefers_newest_run_with_a_report() {
    let (_dir, store) = store();
    write_run_meta(&store, &meta("2026-03-13T09-00-00-000Z")).unwrap();
    write_run_meta(&store, &meta("2026-03-14T09-00-00-000Z")).unwrap();
    std::fs::write(
        store
            .run_dir("nightly", "2026-03-13T09-00-00-000Z")
            .join(REPORT_FILE),
        "older findings",
    )
    .unwrap();
    // Newest run produced no report; the previous one is used
    assert_eq!(
        latest_report(&store, "nightly").as_deref(),
        Some("older findings")
    );

    std::fs::write(
        store
            .run_dir("nightly", "2026-03-14T09-00-00-000Z")
            .join(REPORT_FILE),
        "fresh findings",
    )
    .unwrap();
    assert_eq!(
        latest_report(&store, "nightly").as_deref(),
        Some("fresh findings")
    );
}

#[test]
fn latest_report_none_without_runs() {
    let (_dir, store) = store();
    assert_eq!(latest_report(&store, "nightly"), None);
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&RunStatus::Timeout).unwrap();
    assert_eq!(json, "\"timeout\"");
}
