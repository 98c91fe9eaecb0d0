// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent command-line assembly for daemon jobs.
//!
//! Each daemon agent has a base argv template with a `{prompt}` slot; mode
//! flags, allowed dirs, and the model are appended per the agent's own CLI
//! conventions.

use crate::error::JobError;
use crate::spec::{JobMode, JobSpec};
use agx_core::{expand_tilde, AgentKind};
use std::path::Path;

/// Base argv per daemon agent. The templates request streaming JSON output
/// so the runner can tail and extract reports.
const BASE_ARGV: [(AgentKind, &[&str]); 3] = [
    (
        AgentKind::Claude,
        &[
            "claude",
            "-p",
            "{prompt}",
            "--output-format",
            "stream-json",
            "--verbose",
        ],
    ),
    (AgentKind::Codex, &["codex", "exec", "--json", "{prompt}"]),
    (AgentKind::Gemini, &["gemini", "--prompt", "{prompt}", "--output-format", "stream-json"]),
];

/// Assemble the argv for one job invocation.
///
/// `resolved_prompt` is the prompt after template substitution; `home` is
/// the real user home used to expand `~` in allowed dirs.
pub fn build_command(
    job: &JobSpec,
    resolved_prompt: &str,
    home: &Path,
) -> Result<Vec<String>, JobError> {
    let base = BASE_ARGV
        .iter()
        .find(|(agent, _)| *agent == job.agent)
        .map(|(_, argv)| *argv)
        .ok_or(JobError::UnsupportedAgent { agent: job.agent })?;

    let mut argv: Vec<String> = base
        .iter()
        .map(|part| {
            if *part == "{prompt}" {
                resolved_prompt.to_string()
            } else {
                (*part).to_string()
            }
        })
        .collect();

    match job.agent {
        AgentKind::Claude => {
            argv.push("--permission-mode".to_string());
            argv.push(
                match job.mode {
                    JobMode::Plan => "plan",
                    JobMode::Edit => "acceptEdits",
                }
                .to_string(),
            );
            for dir in &job.allow.dirs {
                argv.push("--add-dir".to_string());
                argv.push(expand_tilde(dir, home).display().to_string());
            }
        }
        AgentKind::Codex => {
            if job.mode == JobMode::Edit {
                argv.push("--full-auto".to_string());
            }
        }
        AgentKind::Gemini => {
            if job.mode == JobMode::Edit {
                argv.push("--yolo".to_string());
            }
        }
        _ => {}
    }

    if let Some(model) = job.model() {
        argv.push("--model".to_string());
        argv.push(model.to_string());
    }

    Ok(argv)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
