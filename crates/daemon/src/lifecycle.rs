// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: pid file, start/stop, the run loop, and reload.

use crate::error::{io_err, DaemonError};
use crate::executor::Executor;
use crate::monitor::{monitor_running_jobs, process_alive};
use crate::scheduler::{FireCallback, Scheduler};
use crate::service::{native_host, DetachedProcess};
use agx_core::{Clock, SystemClock};
use agx_store::Store;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// How long `start` waits for the pid file to appear.
const START_WAIT: Duration = Duration::from_secs(3);
/// Grace between SIGTERM and SIGKILL in `stop`.
const STOP_GRACE: Duration = Duration::from_secs(5);
/// Liveness sweep interval in the run loop.
const MONITOR_INTERVAL: Duration = Duration::from_secs(60);

pub fn daemon_pid_path(store: &Store) -> PathBuf {
    store.home().join("daemon.pid")
}

pub fn daemon_log_path(store: &Store) -> PathBuf {
    store.home().join("daemon.log")
}

/// Pid of the running daemon, if any. A pid file without a live process
/// is stale and cleaned up on the way out.
pub fn is_running(store: &Store) -> Option<u32> {
    let path = daemon_pid_path(store);
    let pid: u32 = std::fs::read_to_string(&path).ok()?.trim().parse().ok()?;
    if process_alive(pid) {
        return Some(pid);
    }
    let _ = std::fs::remove_file(&path);
    None
}

/// Start the daemon: install + start the platform service when one
/// exists, fall back to a plain detached child, then wait for the pid
/// file. Already running is a no-op.
pub async fn start(store: &Store, exe: &Path, user_home: &Path) -> Result<u32, DaemonError> {
    if let Some(pid) = is_running(store) {
        return Ok(pid);
    }

    let mut service_started = false;
    if let Some(host) = native_host(user_home) {
        match host.install(exe).and_then(|()| host.start()) {
            Ok(()) => service_started = true,
            Err(e) => {
                tracing::warn!(error = %e, "service host failed; falling back to detached spawn");
            }
        }
    }
    if !service_started {
        DetachedProcess::spawn(exe)?;
    }

    let deadline = tokio::time::Instant::now() + START_WAIT;
    while tokio::time::Instant::now() < deadline {
        if let Some(pid) = is_running(store) {
            return Ok(pid);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(DaemonError::StartTimeout(START_WAIT))
}

/// Stop the daemon: best-effort service teardown, then SIGTERM with a
/// SIGKILL fallback, then pid file removal.
pub async fn stop(store: &Store, user_home: &Path) -> Result<(), DaemonError> {
    if let Some(host) = native_host(user_home) {
        if let Err(e) = host.stop() {
            tracing::debug!(error = %e, "service stop failed (may not be service-hosted)");
        }
        if let Err(e) = host.uninstall() {
            tracing::debug!(error = %e, "service uninstall failed");
        }
    }

    let Some(pid) = is_running(store) else {
        return Err(DaemonError::NotRunning);
    };

    signal_pid(pid, Signal::SIGTERM)?;
    let deadline = tokio::time::Instant::now() + STOP_GRACE;
    while process_alive(pid) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    if process_alive(pid) {
        signal_pid(pid, Signal::SIGKILL)?;
    }

    let path = daemon_pid_path(store);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err("remove", &path, e)),
    }
}

/// Ask a running daemon to re-read the jobs directory.
pub fn signal_reload(store: &Store) -> Result<(), DaemonError> {
    let pid = is_running(store).ok_or(DaemonError::NotRunning)?;
    signal_pid(pid, Signal::SIGHUP)
}

fn signal_pid(pid: u32, signal: Signal) -> Result<(), DaemonError> {
    kill(Pid::from_raw(pid as i32), signal).map_err(|source| DaemonError::Signal { pid, source })
}

/// Daemon entry point, reached via the hidden `daemon _run` subcommand.
///
/// Writes the pid file, schedules every enabled job with a detached
/// executor callback, sweeps for orphaned runs every minute, reloads on
/// SIGHUP, and exits cleanly on SIGTERM/SIGINT.
pub async fn run(store: Store, user_home: PathBuf) -> Result<(), DaemonError> {
    store.ensure_layout()?;
    init_logging(&store);

    let pid_path = daemon_pid_path(&store);
    std::fs::write(&pid_path, std::process::id().to_string())
        .map_err(|e| io_err("write", &pid_path, e))?;
    tracing::info!(pid = std::process::id(), "daemon starting");

    let executor = Arc::new(Executor::new(store.clone(), user_home, SystemClock));
    let callback: FireCallback = {
        let executor = executor.clone();
        Arc::new(move |job| {
            executor
                .execute_job_detached(job)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    };
    let scheduler = Scheduler::new(callback, SystemClock);
    let loaded = scheduler.load_all(&store)?;
    tracing::info!(jobs = loaded, "scheduler loaded");

    let mut monitor_tick = tokio::time::interval(MONITOR_INTERVAL);
    monitor_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut sighup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
        .map_err(|e| io_err("signal", &pid_path, e))?;
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(|e| io_err("signal", &pid_path, e))?;

    loop {
        tokio::select! {
            _ = monitor_tick.tick() => {
                let now = SystemClock.now_utc().to_rfc3339();
                let transitioned = monitor_running_jobs(&store, &now);
                if !transitioned.is_empty() {
                    tracing::info!(runs = ?transitioned, "cleaned up orphaned runs");
                }
            }
            _ = sighup.recv() => {
                match scheduler.reload_all(&store) {
                    Ok(count) => tracing::info!(jobs = count, "reloaded on SIGHUP"),
                    Err(e) => tracing::error!(error = %e, "reload failed"),
                }
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received; shutting down");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received; shutting down");
                break;
            }
        }
    }

    let _ = std::fs::remove_file(&pid_path);
    tracing::info!("daemon stopped");
    Ok(())
}

/// Append-only daemon log via tracing-appender; ignored when a global
/// subscriber is already installed (tests).
fn init_logging(store: &Store) {
    use tracing_subscriber::EnvFilter;

    let appender = tracing_appender::rolling::never(
        store.home(),
        "daemon.log",
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
