// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! agx-daemon: the sandboxed job runner and cron scheduler daemon.
//!
//! Jobs execute inside an overlay HOME with generated per-agent permission
//! configs and a filtered environment. The daemon process schedules every
//! enabled job, supervises run liveness, and reloads on SIGHUP.

mod env;
mod error;
mod executor;
mod lifecycle;
mod monitor;
mod report;
mod sandbox;
mod scheduler;
mod service;

pub use env::build_spawn_env;
pub use error::DaemonError;
pub use executor::Executor;
pub use lifecycle::{
    daemon_log_path, daemon_pid_path, is_running, run, signal_reload, start, stop,
};
pub use monitor::monitor_running_jobs;
pub use report::extract_report;
pub use sandbox::prepare_home;
pub use scheduler::{ScheduledJob, Scheduler};
pub use service::{native_host, DetachedProcess, LaunchdHost, ServiceHost, SystemdUserHost};
