// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation run records.
//!
//! Each run owns `runs/{job}/{run_id}/` with `meta.json`, the captured
//! `stdout.log`, and optionally the extracted `report.md`. Run ids are
//! timestamp-derived so lexicographic order is real-time order, and status
//! transitions are monotonic: once terminal, a record never goes back to
//! running.

use crate::error::{io_err, JobError};
use agx_core::AgentKind;
use agx_store::Store;
use serde::{Deserialize, Serialize};

pub const META_FILE: &str = "meta.json";
pub const LOG_FILE: &str = "stdout.log";
pub const REPORT_FILE: &str = "report.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Timeout,
}

agx_core::simple_display! {
    RunStatus {
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Timeout => "timeout",
    }
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    pub job_name: String,
    pub run_id: String,
    pub agent: AgentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    pub status: RunStatus,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl RunMeta {
    pub fn new(job_name: &str, run_id: &str, agent: AgentKind, started_at: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            run_id: run_id.to_string(),
            agent,
            pid: None,
            status: RunStatus::Running,
            started_at: started_at.to_string(),
            completed_at: None,
            exit_code: None,
        }
    }

    /// Transition to a terminal status. No-op if already terminal, so a
    /// monitor pass can never clobber a finished record.
    pub fn finish(&mut self, status: RunStatus, exit_code: Option<i32>, at: &str) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.exit_code = exit_code;
        self.completed_at = Some(at.to_string());
        true
    }
}

/// Write a run's meta.json, creating the run directory if needed.
pub fn write_run_meta(store: &Store, meta: &RunMeta) -> Result<(), JobError> {
    let dir = store.run_dir(&meta.job_name, &meta.run_id);
    std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
    let path = dir.join(META_FILE);
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| io_err("write", &path, std::io::Error::other(e)))?;
    std::fs::write(&path, json).map_err(|e| io_err("write", &path, e))?;
    Ok(())
}

/// Read a run's meta.json.
pub fn read_run_meta(store: &Store, job: &str, run_id: &str) -> Result<RunMeta, JobError> {
    let path = store.run_dir(job, run_id).join(META_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| io_err("read", &path, e))?;
    serde_json::from_str(&content).map_err(|e| io_err("read", &path, std::io::Error::other(e)))
}

/// Run ids for a job, ascending (which is also chronological).
pub fn list_run_ids(store: &Store, job: &str) -> Vec<String> {
    let dir = store.runs_dir().join(job);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut ids: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    ids.sort();
    ids
}

/// Contents of the most recent run's report, if any run produced one.
pub fn latest_report(store: &Store, job: &str) -> Option<String> {
    for run_id in list_run_ids(store, job).into_iter().rev() {
        let path = store.run_dir(job, &run_id).join(REPORT_FILE);
        if let Ok(content) = std::fs::read_to_string(&path) {
            return Some(content);
        }
    }
    None
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
