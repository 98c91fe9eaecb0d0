// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overlay HOME preparation.
//!
//! Each run gets a fresh `jobs/{name}/home/` containing only a generated
//! agent config and symlinks for explicitly allowed directories. The
//! sandbox is filesystem visibility plus env filtering, not a security
//! boundary.

use crate::error::{io_err, DaemonError};
use agx_core::{expand_tilde, AgentKind};
use agx_jobs::{JobMode, JobSpec};
use agx_store::Store;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Closed mapping from allow-list tool names to claude permission rules.
/// Unknown names pass through verbatim.
const CLAUDE_TOOL_RULES: &[(&str, &str)] = &[
    ("web_search", "WebSearch(*)"),
    ("web_fetch", "WebFetch(*)"),
    ("bash", "Bash(*)"),
    ("read", "Read(*)"),
    ("write", "Write(*)"),
    ("edit", "Edit(*)"),
    ("glob", "Glob(*)"),
    ("grep", "Grep(*)"),
    ("notebook_edit", "NotebookEdit(*)"),
];

/// Overlay HOME path for a job.
pub fn overlay_home(store: &Store, job_name: &str) -> PathBuf {
    store.jobs_dir().join(job_name).join("home")
}

/// Build a fresh overlay HOME for one run: destroy any previous overlay,
/// generate the agent's config, and link the allowed directories.
pub fn prepare_home(store: &Store, job: &JobSpec, real_home: &Path) -> Result<PathBuf, DaemonError> {
    let overlay = overlay_home(store, &job.name);
    if overlay.exists() {
        std::fs::remove_dir_all(&overlay).map_err(|e| io_err("remove", &overlay, e))?;
    }
    std::fs::create_dir_all(&overlay).map_err(|e| io_err("create", &overlay, e))?;

    match job.agent {
        AgentKind::Claude => write_claude_settings(&overlay, job, real_home)?,
        AgentKind::Codex => write_codex_config(&overlay, job)?,
        AgentKind::Gemini => write_gemini_settings(&overlay, job)?,
        other => {
            return Err(DaemonError::Job(agx_jobs::JobError::UnsupportedAgent {
                agent: other,
            }))
        }
    }

    link_allowed_dirs(&overlay, job, real_home);
    Ok(overlay)
}

fn write_claude_settings(overlay: &Path, job: &JobSpec, real_home: &Path) -> Result<(), DaemonError> {
    let mut allow: Vec<String> = job
        .allow
        .tools
        .iter()
        .map(|tool| {
            CLAUDE_TOOL_RULES
                .iter()
                .find(|(name, _)| name == tool)
                .map(|(_, rule)| (*rule).to_string())
                .unwrap_or_else(|| tool.clone())
        })
        .collect();

    for dir in &job.allow.dirs {
        let expanded = expand_tilde(dir, real_home).display().to_string();
        allow.push(format!("Read({expanded}/**)"));
        if job.mode == JobMode::Edit {
            allow.push(format!("Write({expanded}/**)"));
            allow.push(format!("Edit({expanded}/**)"));
        }
    }

    let settings = json!({
        "permissions": {
            "allow": allow,
            "deny": [],
        }
    });
    write_config(
        &overlay.join(".claude/settings.json"),
        &serde_json::to_string_pretty(&settings).unwrap_or_default(),
    )
}

fn write_codex_config(overlay: &Path, job: &JobSpec) -> Result<(), DaemonError> {
    let mut lines = Vec::new();
    let approval = match job.mode {
        JobMode::Plan => "suggest",
        JobMode::Edit => "full-auto",
    };
    lines.push(format!("approval_mode = \"{approval}\""));
    if let Some(model) = job.model() {
        lines.push(format!("model = \"{model}\""));
    }
    // Remaining scalar keys pass through: strings quoted, the rest bare.
    for (key, value) in &job.config {
        if key == "model" {
            continue;
        }
        match value {
            serde_yaml::Value::String(s) => lines.push(format!("{key} = \"{s}\"")),
            serde_yaml::Value::Bool(b) => lines.push(format!("{key} = {b}")),
            serde_yaml::Value::Number(n) => lines.push(format!("{key} = {n}")),
            _ => {}
        }
    }
    let mut body = lines.join("\n");
    body.push('\n');
    write_config(&overlay.join(".codex/config.toml"), &body)
}

fn write_gemini_settings(overlay: &Path, job: &JobSpec) -> Result<(), DaemonError> {
    let mut settings = serde_json::Map::new();
    for (key, value) in &job.config {
        if let Ok(v) = serde_json::to_value(value) {
            settings.insert(key.clone(), v);
        }
    }
    write_config(
        &overlay.join(".gemini/settings.json"),
        &serde_json::to_string_pretty(&serde_json::Value::Object(settings)).unwrap_or_default(),
    )
}

fn write_config(path: &Path, content: &str) -> Result<(), DaemonError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| io_err("write", path, e))
}

/// Symlink each allowed dir under the overlay at the same HOME-relative
/// path. Dirs outside the real HOME are silently skipped.
fn link_allowed_dirs(overlay: &Path, job: &JobSpec, real_home: &Path) {
    for dir in &job.allow.dirs {
        let target = expand_tilde(dir, real_home);
        let Ok(relative) = target.strip_prefix(real_home) else {
            continue;
        };
        let link = overlay.join(relative);
        if let Some(parent) = link.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                continue;
            }
        }
        if let Err(e) = symlink(&target, &link) {
            tracing::debug!(dir = %target.display(), error = %e, "failed to link allowed dir");
        }
    }
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn symlink(_source: &Path, _target: &Path) -> std::io::Result<()> {
    Err(std::io::Error::other("symlinks unsupported"))
}

#[cfg(test)]
#[path = "sandbox_tests.rs"]
mod tests;
