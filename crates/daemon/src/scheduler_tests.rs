// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_core::SystemClock;
use agx_jobs::write_job;
use tempfile::TempDir;

fn noop_callback() -> FireCallback {
    Arc::new(|_job| Ok(()))
}

fn job(name: &str) -> JobSpec {
    JobSpec::builder().name(name).schedule("0 3 * * *").build()
}

#[tokio::test]
async fn schedule_twice_keeps_one_trigger() {
    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    scheduler.schedule(job("nightly")).unwrap();
    scheduler.schedule(job("nightly")).unwrap();
    assert_eq!(scheduler.scheduled_count(), 1);
}

#[tokio::test]
async fn unschedule_removes_trigger() {
    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    scheduler.schedule(job("nightly")).unwrap();
    scheduler.unschedule("nightly");
    assert_eq!(scheduler.scheduled_count(), 0);
    assert_eq!(scheduler.next_run("nightly"), None);
    // Unknown names are a no-op
    scheduler.unschedule("ghost");
}

#[tokio::test]
async fn invalid_schedule_is_rejected() {
    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    let bad = JobSpec::builder().name("bad").schedule("nope").build();
    assert!(matches!(
        scheduler.schedule(bad),
        Err(DaemonError::Schedule { .. })
    ));
}

#[tokio::test]
async fn next_run_is_in_the_future() {
    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    scheduler.schedule(job("nightly")).unwrap();
    let next = scheduler.next_run("nightly").unwrap();
    assert!(next > Utc::now());
}

#[tokio::test]
async fn load_all_imports_only_enabled_jobs() {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    store.ensure_layout().unwrap();
    write_job(&store, &job("on")).unwrap();
    let mut off = job("off");
    off.enabled = false;
    write_job(&store, &off).unwrap();

    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    let count = scheduler.load_all(&store).unwrap();
    assert_eq!(count, 1);
    let listed = scheduler.list_scheduled();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "on");
    assert_eq!(listed[0].schedule, "0 3 * * *");
    assert!(listed[0].next_run.is_some());
}

#[tokio::test]
async fn reload_all_stops_and_reimports() {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    store.ensure_layout().unwrap();
    write_job(&store, &job("a")).unwrap();

    let scheduler = Scheduler::new(noop_callback(), SystemClock);
    scheduler.load_all(&store).unwrap();
    // A trigger not present on disk disappears on reload
    scheduler.schedule(job("transient")).unwrap();
    assert_eq!(scheduler.scheduled_count(), 2);

    write_job(&store, &job("b")).unwrap();
    let count = scheduler.reload_all(&store).unwrap();
    assert_eq!(count, 2);
    let names: Vec<String> = scheduler
        .list_scheduled()
        .into_iter()
        .map(|j| j.name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn trigger_fires_through_the_callback() {
    let fired = Arc::new(Mutex::new(Vec::<String>::new()));
    let fired_clone = fired.clone();
    let callback: FireCallback = Arc::new(move |job| {
        fired_clone.lock().push(job.name);
        Ok(())
    });

    let scheduler = Scheduler::new(callback, SystemClock);
    scheduler
        .schedule(JobSpec::builder().name("minutely").schedule("* * * * *").build())
        .unwrap();

    // Paused tokio time auto-advances through the sleep to the next fire
    for _ in 0..200 {
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        if !fired.lock().is_empty() {
            break;
        }
    }
    scheduler.unschedule("minutely");
    assert!(!fired.lock().is_empty(), "trigger never fired");
    assert_eq!(fired.lock()[0], "minutely");
}

#[tokio::test]
async fn callback_errors_do_not_unschedule() {
    let callback: FireCallback = Arc::new(|_| Err("boom".to_string()));
    let scheduler = Scheduler::new(callback, SystemClock);
    scheduler.schedule(job("nightly")).unwrap();
    assert_eq!(scheduler.scheduled_count(), 1);
}
