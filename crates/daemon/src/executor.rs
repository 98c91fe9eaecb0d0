// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job execution: spawn the agent in its overlay HOME, tail stdout to the
//! run directory, enforce the timeout, and extract the report.

use crate::env::build_spawn_env;
use crate::error::{io_err, DaemonError};
use crate::report::extract_report;
use crate::sandbox::prepare_home;
use agx_core::{run_id, Clock};
use agx_jobs::{
    build_command, latest_report, render_prompt, write_run_meta, JobSpec, RunMeta, RunStatus,
};
use agx_store::Store;
use agx_versions::VersionManager;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

/// Grace between SIGTERM and SIGKILL on timeout.
const TERM_GRACE: Duration = Duration::from_secs(5);

pub struct Executor<C: Clock> {
    store: Store,
    real_home: PathBuf,
    clock: C,
}

impl<C: Clock + 'static> Executor<C> {
    pub fn new(store: Store, real_home: PathBuf, clock: C) -> Self {
        Self {
            store,
            real_home,
            clock,
        }
    }

    /// Run a job to completion and return the terminal run record.
    pub async fn execute_job(&self, job: &JobSpec) -> Result<RunMeta, DaemonError> {
        let timeout = job.timeout_duration().map_err(|e| DaemonError::Schedule {
            job: job.name.clone(),
            reason: e.to_string(),
        })?;
        self.execute_with_timeout(job, timeout).await
    }

    /// Start a job but do not await it; returns right after the initial
    /// meta is on disk.
    pub fn execute_job_detached(&self, job: JobSpec) -> Result<RunMeta, DaemonError> {
        let meta = self.initial_meta(&job)?;
        let store = self.store.clone();
        let real_home = self.real_home.clone();
        let clock = self.clock.clone();
        let initial = meta.clone();
        tokio::spawn(async move {
            let executor = Executor::new(store, real_home, clock);
            let timeout = job
                .timeout_duration()
                .unwrap_or(Duration::from_secs(30 * 60));
            if let Err(e) = executor.run_spawned(&job, initial, timeout).await {
                tracing::error!(job = %job.name, error = %e, "detached job run failed");
            }
        });
        Ok(meta)
    }

    pub(crate) async fn execute_with_timeout(
        &self,
        job: &JobSpec,
        timeout: Duration,
    ) -> Result<RunMeta, DaemonError> {
        let meta = self.initial_meta(job)?;
        self.run_spawned(job, meta, timeout).await
    }

    /// Create the run dir and write the initial running record.
    fn initial_meta(&self, job: &JobSpec) -> Result<RunMeta, DaemonError> {
        let now = self.clock.now_utc();
        let meta = RunMeta::new(&job.name, &run_id(now), job.agent, &now.to_rfc3339());
        write_run_meta(&self.store, &meta)?;
        Ok(meta)
    }

    async fn run_spawned(
        &self,
        job: &JobSpec,
        mut meta: RunMeta,
        timeout: Duration,
    ) -> Result<RunMeta, DaemonError> {
        let run_dir = self.store.run_dir(&meta.job_name, &meta.run_id);
        let log_path = run_dir.join(agx_jobs::LOG_FILE);

        let prompt = render_prompt(
            &job.prompt,
            &job.name,
            latest_report(&self.store, &job.name).as_deref(),
            self.clock.now_utc(),
        );
        let argv = build_command(job, &prompt, &self.real_home)?;
        let overlay = prepare_home(&self.store, job, &self.real_home)?;

        let log = std::fs::File::create(&log_path).map_err(|e| io_err("create", &log_path, e))?;
        let log_err = log.try_clone().map_err(|e| io_err("clone", &log_path, e))?;

        let program = self.resolve_binary(job, &argv[0]);
        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .env_clear()
            .envs(build_spawn_env(&overlay));
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                meta.finish(RunStatus::Failed, None, &self.clock.now_utc().to_rfc3339());
                write_run_meta(&self.store, &meta)?;
                tracing::warn!(job = %job.name, error = %e, "failed to spawn agent");
                return Ok(meta);
            }
        };

        meta.pid = child.id();
        write_run_meta(&self.store, &meta)?;
        tracing::info!(job = %job.name, run = %meta.run_id, pid = ?meta.pid, "job started");

        let status = tokio::time::timeout(timeout, child.wait()).await;
        match status {
            Ok(Ok(status)) => {
                let code = status.code();
                let terminal = if status.success() {
                    RunStatus::Completed
                } else {
                    RunStatus::Failed
                };
                meta.finish(terminal, code, &self.clock.now_utc().to_rfc3339());
            }
            Ok(Err(e)) => {
                meta.finish(RunStatus::Failed, None, &self.clock.now_utc().to_rfc3339());
                tracing::warn!(job = %job.name, error = %e, "wait failed");
            }
            Err(_elapsed) => {
                // Timeout: SIGTERM the group, then SIGKILL stragglers.
                if let Some(pid) = meta.pid {
                    kill_group(pid, Signal::SIGTERM);
                    if tokio::time::timeout(TERM_GRACE, child.wait()).await.is_err() {
                        kill_group(pid, Signal::SIGKILL);
                        let _ = child.wait().await;
                    }
                }
                meta.finish(RunStatus::Timeout, None, &self.clock.now_utc().to_rfc3339());
                tracing::warn!(job = %job.name, run = %meta.run_id, "job timed out");
            }
        }
        write_run_meta(&self.store, &meta)?;

        save_report(&self.store, &meta, &log_path);
        Ok(meta)
    }

    /// Absolute binary for the pinned (or default) managed version; bare
    /// CLI name otherwise, resolved from PATH at spawn.
    fn resolve_binary(&self, job: &JobSpec, cli_name: &str) -> String {
        // The manager is only used for path lookups here; it never spawns.
        let versions = VersionManager::new(
            self.store.clone(),
            std::sync::Arc::new(agx_adapters::SystemProcessRunner),
        );
        let version = job
            .version
            .clone()
            .or_else(|| versions.default_version(job.agent));
        if let Some(version) = version {
            if versions.is_installed(job.agent, &version) {
                return versions
                    .binary_path(job.agent, &version)
                    .display()
                    .to_string();
            }
        }
        cli_name.to_string()
    }
}

/// Extract and persist the report next to the log, if any text survived.
pub(crate) fn save_report(store: &Store, meta: &RunMeta, log_path: &Path) {
    let Ok(log) = std::fs::read_to_string(log_path) else {
        return;
    };
    let Some(report) = extract_report(&log, meta.agent) else {
        return;
    };
    let path = store
        .run_dir(&meta.job_name, &meta.run_id)
        .join(agx_jobs::REPORT_FILE);
    if let Err(e) = std::fs::write(&path, report) {
        tracing::warn!(path = %path.display(), error = %e, "failed to write report");
    }
}

/// Signal an entire process group; falls back to the single pid when the
/// group is gone.
pub(crate) fn kill_group(pid: u32, signal: Signal) {
    let group = Pid::from_raw(-(pid as i32));
    if kill(group, signal).is_err() {
        let _ = kill(Pid::from_raw(pid as i32), signal);
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
