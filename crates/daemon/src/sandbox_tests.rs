// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_jobs::AllowList;
use tempfile::TempDir;

fn setup() -> (TempDir, Store, PathBuf) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("agents-home"));
    store.ensure_layout().unwrap();
    let real_home = dir.path().join("real-home");
    std::fs::create_dir_all(&real_home).unwrap();
    (dir, store, real_home)
}

fn claude_job(mode: JobMode, allow: AllowList) -> JobSpec {
    JobSpec::builder()
        .name("nightly")
        .agent(AgentKind::Claude)
        .mode(mode)
        .allow(allow)
        .build()
}

#[test]
fn claude_plan_settings_map_tools() {
    let (_dir, store, home) = setup();
    let job = claude_job(
        JobMode::Plan,
        AllowList {
            tools: vec!["web_search".into(), "bash".into(), "CustomTool(x)".into()],
            ..AllowList::default()
        },
    );
    let overlay = prepare_home(&store, &job, &home).unwrap();

    let settings: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(overlay.join(".claude/settings.json")).unwrap(),
    )
    .unwrap();
    let allow: Vec<&str> = settings["permissions"]["allow"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(allow, vec!["WebSearch(*)", "Bash(*)", "CustomTool(x)"]);
    assert!(settings["permissions"]["deny"].as_array().unwrap().is_empty());
}

#[test]
fn claude_dirs_get_read_rules_and_edit_rules_in_edit_mode() {
    let (_dir, store, home) = setup();
    let allow = AllowList {
        dirs: vec!["~/code".into()],
        ..AllowList::default()
    };

    let plan = claude_job(JobMode::Plan, allow.clone());
    let overlay = prepare_home(&store, &plan, &home).unwrap();
    let content = std::fs::read_to_string(overlay.join(".claude/settings.json")).unwrap();
    let expanded = home.join("code").display().to_string();
    assert!(content.contains(&format!("Read({expanded}/**)")));
    assert!(!content.contains(&format!("Write({expanded}/**)")));

    let edit = claude_job(JobMode::Edit, allow);
    let overlay = prepare_home(&store, &edit, &home).unwrap();
    let content = std::fs::read_to_string(overlay.join(".claude/settings.json")).unwrap();
    assert!(content.contains(&format!("Write({expanded}/**)")));
    assert!(content.contains(&format!("Edit({expanded}/**)")));
}

#[test]
fn codex_config_reflects_mode_and_scalars() {
    let (_dir, store, home) = setup();
    let mut job = JobSpec::builder()
        .name("codex-job")
        .agent(AgentKind::Codex)
        .mode(JobMode::Edit)
        .build();
    job.config
        .insert("model".into(), serde_yaml::Value::from("o4-mini"));
    job.config
        .insert("sandbox".into(), serde_yaml::Value::from(true));
    job.config
        .insert("max_tokens".into(), serde_yaml::Value::from(4096));
    job.config.insert(
        "nested".into(),
        serde_yaml::from_str("a: 1").unwrap(),
    );

    let overlay = prepare_home(&store, &job, &home).unwrap();
    let content = std::fs::read_to_string(overlay.join(".codex/config.toml")).unwrap();
    assert!(content.contains("approval_mode = \"full-auto\""));
    assert!(content.contains("model = \"o4-mini\""));
    assert!(content.contains("sandbox = true"));
    assert!(content.contains("max_tokens = 4096"));
    // Non-scalar keys are not emitted
    assert!(!content.contains("nested"));
}

#[test]
fn codex_plan_mode_is_suggest() {
    let (_dir, store, home) = setup();
    let job = JobSpec::builder()
        .name("codex-plan")
        .agent(AgentKind::Codex)
        .build();
    let overlay = prepare_home(&store, &job, &home).unwrap();
    let content = std::fs::read_to_string(overlay.join(".codex/config.toml")).unwrap();
    assert!(content.contains("approval_mode = \"suggest\""));
}

#[test]
fn gemini_settings_merge_full_config() {
    let (_dir, store, home) = setup();
    let mut job = JobSpec::builder()
        .name("gem")
        .agent(AgentKind::Gemini)
        .build();
    job.config
        .insert("model".into(), serde_yaml::Value::from("gemini-pro"));
    job.config
        .insert("temperature".into(), serde_yaml::Value::from(0.2));

    let overlay = prepare_home(&store, &job, &home).unwrap();
    let settings: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(overlay.join(".gemini/settings.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(settings["model"], "gemini-pro");
    assert_eq!(settings["temperature"], 0.2);
}

#[cfg(unix)]
#[test]
fn allowed_dirs_inside_home_are_linked() {
    let (_dir, store, home) = setup();
    std::fs::create_dir_all(home.join("code/api")).unwrap();
    let job = claude_job(
        JobMode::Plan,
        AllowList {
            dirs: vec!["~/code/api".into(), "/outside/home".into()],
            ..AllowList::default()
        },
    );
    let overlay = prepare_home(&store, &job, &home).unwrap();

    let link = overlay.join("code/api");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(std::fs::read_link(&link).unwrap(), home.join("code/api"));
    // Outside-home dirs are silently skipped
    assert!(!overlay.join("outside").exists());
}

#[test]
fn overlay_is_destroyed_and_recreated() {
    let (_dir, store, home) = setup();
    let job = claude_job(JobMode::Plan, AllowList::default());
    let overlay = prepare_home(&store, &job, &home).unwrap();
    std::fs::write(overlay.join("stale-file"), "x").unwrap();

    let overlay = prepare_home(&store, &job, &home).unwrap();
    assert!(!overlay.join("stale-file").exists());
    assert!(overlay.join(".claude/settings.json").is_file());
}

#[test]
fn unsupported_agent_is_rejected() {
    let (_dir, store, home) = setup();
    let job = JobSpec::builder()
        .name("bad")
        .agent(AgentKind::Cursor)
        .build();
    assert!(prepare_home(&store, &job, &home).is_err());
}
