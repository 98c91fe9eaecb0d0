// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run liveness supervision.
//!
//! The daemon ticks this every minute: any run still marked running whose
//! pid is gone gets a terminal `failed` record and a report salvage pass.

use crate::executor::save_report;
use agx_jobs::{read_run_meta, write_run_meta, RunStatus};
use agx_store::Store;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Sweep every run directory for dead running jobs. Returns the names of
/// the runs that were transitioned.
pub fn monitor_running_jobs(store: &Store, now_iso: &str) -> Vec<String> {
    let mut transitioned = Vec::new();
    let Ok(jobs) = std::fs::read_dir(store.runs_dir()) else {
        return transitioned;
    };

    for job_entry in jobs.flatten().filter(|e| e.path().is_dir()) {
        let Ok(job_name) = job_entry.file_name().into_string() else {
            continue;
        };
        let Ok(runs) = std::fs::read_dir(job_entry.path()) else {
            continue;
        };
        for run_entry in runs.flatten().filter(|e| e.path().is_dir()) {
            let Ok(run_id) = run_entry.file_name().into_string() else {
                continue;
            };
            let Ok(mut meta) = read_run_meta(store, &job_name, &run_id) else {
                continue;
            };
            if meta.status != RunStatus::Running {
                continue;
            }
            let Some(pid) = meta.pid else {
                // Spawner is mid-write; leave it for the next tick
                continue;
            };
            if process_alive(pid) {
                continue;
            }

            meta.finish(RunStatus::Failed, None, now_iso);
            if write_run_meta(store, &meta).is_err() {
                continue;
            }
            save_report(
                store,
                &meta,
                &store.run_dir(&job_name, &run_id).join(agx_jobs::LOG_FILE),
            );
            tracing::warn!(job = %job_name, run = %run_id, pid, "orphaned run marked failed");
            transitioned.push(format!("{job_name}/{run_id}"));
        }
    }
    transitioned
}

/// `kill(pid, 0)` liveness probe.
pub(crate) fn process_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
