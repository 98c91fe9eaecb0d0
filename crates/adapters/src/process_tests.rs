// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_runner_records_calls() {
    let runner = FakeProcessRunner::new();
    runner
        .run(ProcessRequest::new("npm", &["install", "pkg"]))
        .await
        .unwrap();
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "npm");
    assert_eq!(calls[0].args, vec!["install", "pkg"]);
}

#[tokio::test]
async fn fake_runner_serves_scripted_responses_in_order() {
    let runner = FakeProcessRunner::new();
    runner.respond("git", 0, "first", "");
    runner.respond("git", 1, "", "boom");
    let a = runner.run(ProcessRequest::new("git", &[])).await.unwrap();
    let b = runner.run(ProcessRequest::new("git", &[])).await.unwrap();
    assert_eq!(a.stdout, "first");
    assert_eq!(b.status, 1);
}

#[tokio::test]
async fn unscripted_programs_succeed() {
    let runner = FakeProcessRunner::new();
    let out = runner.run(ProcessRequest::new("true", &[])).await.unwrap();
    assert!(out.success());
}

#[tokio::test]
async fn side_effects_run_before_recording() {
    let runner = FakeProcessRunner::new();
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");
    let marker_clone = marker.clone();
    runner.on_call(move |_req| {
        std::fs::write(&marker_clone, "x").unwrap();
    });
    runner.run(ProcessRequest::new("npm", &[])).await.unwrap();
    assert!(marker.exists());
}

#[test]
fn failure_summary_prefers_last_stderr_line() {
    let out = ProcessOutput {
        status: 2,
        stdout: String::new(),
        stderr: "warning: x\nerror: real cause\n".to_string(),
    };
    assert_eq!(out.failure_summary(), "error: real cause");
}

#[test]
fn failure_summary_falls_back_to_status() {
    let out = ProcessOutput {
        status: 127,
        stdout: String::new(),
        stderr: String::new(),
    };
    assert_eq!(out.failure_summary(), "exited with status 127");
}

#[cfg(unix)]
#[tokio::test]
async fn system_runner_captures_output() {
    let runner = SystemProcessRunner;
    let out = runner
        .run(ProcessRequest::new("sh", &["-c", "echo hello"]))
        .await
        .unwrap();
    assert!(out.success());
    assert_eq!(out.stdout.trim(), "hello");
}

#[cfg(unix)]
#[tokio::test]
async fn system_runner_reports_exit_status() {
    let runner = SystemProcessRunner;
    let out = runner
        .run(ProcessRequest::new("sh", &["-c", "exit 3"]))
        .await
        .unwrap();
    assert_eq!(out.status, 3);
}
