// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx daemon`: control the scheduler daemon.

use crate::context::Context;
use crate::exit_error::ExitError;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum DaemonCmd {
    /// Start the daemon (service-hosted when the platform allows)
    Start,
    /// Stop the daemon
    Stop,
    /// Show daemon state
    Status,
    /// Ask a running daemon to re-read the jobs directory
    Reload,
    /// Daemon entry point; invoked by the service descriptor
    #[command(name = "_run", hide = true)]
    Run,
}

pub async fn run(ctx: &Context, cmd: DaemonCmd) -> Result<(), ExitError> {
    match cmd {
        DaemonCmd::Start => {
            let exe =
                std::env::current_exe().map_err(|e| ExitError::fatal(e.to_string()))?;
            let pid = agx_daemon::start(&ctx.store, &exe, &ctx.user_home)
                .await
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("daemon running (pid {pid})");
            Ok(())
        }
        DaemonCmd::Stop => match agx_daemon::stop(&ctx.store, &ctx.user_home).await {
            Ok(()) => {
                println!("daemon stopped");
                Ok(())
            }
            Err(agx_daemon::DaemonError::NotRunning) => {
                println!("daemon not running");
                Ok(())
            }
            Err(e) => Err(ExitError::fatal(e.to_string())),
        },
        DaemonCmd::Status => {
            match agx_daemon::is_running(&ctx.store) {
                Some(pid) => println!("running (pid {pid})"),
                None => println!("not running"),
            }
            Ok(())
        }
        DaemonCmd::Reload => {
            agx_daemon::signal_reload(&ctx.store)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("reload signalled");
            Ok(())
        }
        DaemonCmd::Run => agx_daemon::run(ctx.store.clone(), ctx.user_home.clone())
            .await
            .map_err(|e| ExitError::fatal(e.to_string())),
    }
}
