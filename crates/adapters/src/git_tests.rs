// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::process::FakeProcessRunner;

#[tokio::test]
async fn clone_builds_expected_argv() {
    let runner = std::sync::Arc::new(FakeProcessRunner::new());
    runner.respond("git", 0, "", ""); // clone
    runner.respond("git", 0, "abc1234\n", ""); // rev-parse
    let git = GitCli::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("clone");

    let sync = git
        .clone_or_pull("https://github.com/alice/cfg.git", "main", &target)
        .await
        .unwrap();

    assert!(sync.is_new);
    assert_eq!(sync.commit, "abc1234");
    let calls = runner.calls_for("git");
    assert_eq!(calls[0].args[0], "clone");
    assert!(calls[0].args.contains(&"--branch".to_string()));
    assert!(calls[0].args.contains(&"main".to_string()));
}

#[tokio::test]
async fn existing_clone_pulls() {
    let runner = std::sync::Arc::new(FakeProcessRunner::new());
    for stdout in ["", "", "", "def5678\n"] {
        runner.respond("git", 0, stdout, "");
    }
    let git = GitCli::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();

    let sync = git
        .clone_or_pull("https://github.com/alice/cfg.git", "main", dir.path())
        .await
        .unwrap();

    assert!(!sync.is_new);
    let ops: Vec<String> = runner
        .calls_for("git")
        .iter()
        .map(|c| c.args[0].clone())
        .collect();
    assert_eq!(ops, vec!["fetch", "checkout", "pull", "rev-parse"]);
}

#[tokio::test]
async fn failed_command_surfaces_stderr() {
    let runner = std::sync::Arc::new(FakeProcessRunner::new());
    runner.respond("git", 128, "", "fatal: repository not found\n");
    let git = GitCli::new(runner);
    let dir = tempfile::tempdir().unwrap();
    let err = git
        .clone_or_pull("https://github.com/x/y.git", "main", &dir.path().join("t"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("repository not found"));
}

#[tokio::test]
async fn fake_git_materializes_fixture_files() {
    let git = FakeGit::new().with_repo(
        "gh:alice/cfg",
        "abc1234",
        &[("agents.yaml", "agents: {}\n"), ("shared/commands/d.md", "D")],
    );
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("repo");

    let sync = git.clone_or_pull("gh:alice/cfg", "main", &target).await.unwrap();
    assert!(sync.is_new);
    assert!(target.join("shared/commands/d.md").is_file());

    let again = git.clone_or_pull("gh:alice/cfg", "main", &target).await.unwrap();
    assert!(!again.is_new);
}

#[tokio::test]
async fn fake_git_unknown_source_errors() {
    let git = FakeGit::new();
    let dir = tempfile::tempdir().unwrap();
    assert!(git
        .clone_or_pull("gh:missing/repo", "main", dir.path())
        .await
        .is_err());
}
