// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::spec::AllowList;
use std::path::PathBuf;

fn home() -> PathBuf {
    PathBuf::from("/home/u")
}

#[test]
fn claude_plan_mode() {
    let job = JobSpec::builder().agent(AgentKind::Claude).build();
    let argv = build_command(&job, "do the thing", &home()).unwrap();
    assert_eq!(argv[0], "claude");
    assert_eq!(argv[1], "-p");
    assert_eq!(argv[2], "do the thing");
    let mode_at = argv.iter().position(|a| a == "--permission-mode").unwrap();
    assert_eq!(argv[mode_at + 1], "plan");
}

#[test]
fn claude_edit_mode_accepts_edits() {
    let job = JobSpec::builder()
        .agent(AgentKind::Claude)
        .mode(JobMode::Edit)
        .build();
    let argv = build_command(&job, "p", &home()).unwrap();
    let mode_at = argv.iter().position(|a| a == "--permission-mode").unwrap();
    assert_eq!(argv[mode_at + 1], "acceptEdits");
}

#[test]
fn claude_add_dirs_expand_tilde() {
    let job = JobSpec::builder()
        .agent(AgentKind::Claude)
        .allow(AllowList {
            dirs: vec!["~/code".into(), "/srv/data".into()],
            ..AllowList::default()
        })
        .build();
    let argv = build_command(&job, "p", &home()).unwrap();
    let dirs: Vec<&String> = argv
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "--add-dir")
        .map(|(i, _)| &argv[i + 1])
        .collect();
    assert_eq!(dirs, vec!["/home/u/code", "/srv/data"]);
}

#[test]
fn codex_edit_mode_is_full_auto() {
    let plan = JobSpec::builder().agent(AgentKind::Codex).build();
    assert!(!build_command(&plan, "p", &home())
        .unwrap()
        .contains(&"--full-auto".to_string()));

    let edit = JobSpec::builder()
        .agent(AgentKind::Codex)
        .mode(JobMode::Edit)
        .build();
    let argv = build_command(&edit, "p", &home()).unwrap();
    assert_eq!(argv[0], "codex");
    assert!(argv.contains(&"--full-auto".to_string()));
}

#[test]
fn gemini_edit_mode_is_yolo() {
    let edit = JobSpec::builder()
        .agent(AgentKind::Gemini)
        .mode(JobMode::Edit)
        .build();
    let argv = build_command(&edit, "p", &home()).unwrap();
    assert_eq!(argv[0], "gemini");
    assert!(argv.contains(&"--yolo".to_string()));
}

#[test]
fn model_is_appended_for_all_agents() {
    for agent in AgentKind::DAEMON {
        let mut job = JobSpec::builder().agent(agent).build();
        job.config
            .insert("model".into(), serde_yaml::Value::from("m1"));
        let argv = build_command(&job, "p", &home()).unwrap();
        let model_at = argv.iter().position(|a| a == "--model").unwrap();
        assert_eq!(argv[model_at + 1], "m1");
    }
}

#[test]
fn codex_ignores_allow_dirs() {
    let job = JobSpec::builder()
        .agent(AgentKind::Codex)
        .allow(AllowList {
            dirs: vec!["~/code".into()],
            ..AllowList::default()
        })
        .build();
    let argv = build_command(&job, "p", &home()).unwrap();
    assert!(!argv.contains(&"--add-dir".to_string()));
}

#[test]
fn unsupported_agent_errors() {
    let job = JobSpec::builder().agent(AgentKind::Windsurf).build();
    let err = build_command(&job, "p", &home()).unwrap_err();
    assert!(err.to_string().contains("not supported for daemon jobs"));
}

#[test]
fn prompt_is_a_single_argv_entry() {
    let job = JobSpec::builder().agent(AgentKind::Claude).build();
    let argv = build_command(&job, "multi word prompt; $HOME", &home()).unwrap();
    assert!(argv.contains(&"multi word prompt; $HOME".to_string()));
}
