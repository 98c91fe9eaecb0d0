// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx jobs`: scheduled job management.

use crate::context::Context;
use crate::exit_error::ExitError;
use agx_daemon::Executor;
use agx_jobs::{
    delete_job, job_path, latest_report, list_run_ids, load_all_jobs, load_job, read_run_meta,
    write_job, JobSpec,
};
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum JobsCmd {
    /// List jobs and their schedules
    List,
    /// Print one job spec
    Show { name: String },
    /// Add (or update) a job from a YAML file
    Add { file: PathBuf },
    /// Enable a job
    Enable { name: String },
    /// Disable a job
    Disable { name: String },
    /// Delete a job
    Remove { name: String },
    /// Run a job immediately, outside its schedule
    Run { name: String },
    /// List runs of a job
    Runs { name: String },
    /// Print the latest report of a job
    Report { name: String },
}

pub async fn run(ctx: &Context, cmd: JobsCmd) -> Result<(), ExitError> {
    match cmd {
        JobsCmd::List => {
            let jobs = load_all_jobs(&ctx.store).map_err(|e| ExitError::fatal(e.to_string()))?;
            if jobs.is_empty() {
                println!("no jobs");
                return Ok(());
            }
            for job in jobs {
                let state = if job.enabled { "" } else { " (disabled)" };
                println!(
                    "{:<20} {:<16} {} {}{state}",
                    job.name, job.schedule, job.agent, job.mode
                );
            }
            Ok(())
        }
        JobsCmd::Show { name } => {
            let path = job_path(&ctx.store, &name);
            let content = std::fs::read_to_string(&path)
                .map_err(|_| ExitError::fatal(format!("job '{name}' not found")))?;
            print!("{content}");
            Ok(())
        }
        JobsCmd::Add { file } => {
            let content = std::fs::read_to_string(&file)
                .map_err(|e| ExitError::fatal(format!("read {}: {e}", file.display())))?;
            let job: JobSpec = serde_yaml::from_str(&content)
                .map_err(|e| ExitError::fatal(format!("parse {}: {e}", file.display())))?;
            // write_job validates and rejects invalid specs (exit 1)
            let path =
                write_job(&ctx.store, &job).map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("wrote {}", path.display());
            reload_daemon(ctx);
            Ok(())
        }
        JobsCmd::Enable { name } => set_enabled(ctx, &name, true),
        JobsCmd::Disable { name } => set_enabled(ctx, &name, false),
        JobsCmd::Remove { name } => {
            delete_job(&ctx.store, &name).map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("removed job {name}");
            reload_daemon(ctx);
            Ok(())
        }
        JobsCmd::Run { name } => {
            let job = load_job(&ctx.store, &name).map_err(|e| ExitError::fatal(e.to_string()))?;
            let executor = Executor::new(ctx.store.clone(), ctx.user_home.clone(), ctx.clock.clone());
            let meta = executor
                .execute_job(&job)
                .await
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("run {} finished: {}", meta.run_id, meta.status);
            if let Some(report) = latest_report(&ctx.store, &name) {
                println!();
                println!("{report}");
            }
            Ok(())
        }
        JobsCmd::Runs { name } => {
            let ids = list_run_ids(&ctx.store, &name);
            if ids.is_empty() {
                println!("no runs for {name}");
                return Ok(());
            }
            for id in ids {
                match read_run_meta(&ctx.store, &name, &id) {
                    Ok(meta) => {
                        let exit = meta
                            .exit_code
                            .map(|c| format!(" exit {c}"))
                            .unwrap_or_default();
                        println!("{id} {}{exit}", meta.status);
                    }
                    Err(_) => println!("{id} (no meta)"),
                }
            }
            Ok(())
        }
        JobsCmd::Report { name } => match latest_report(&ctx.store, &name) {
            Some(report) => {
                print!("{report}");
                Ok(())
            }
            None => Err(ExitError::fatal(format!("no report for job '{name}'"))),
        },
    }
}

fn set_enabled(ctx: &Context, name: &str, enabled: bool) -> Result<(), ExitError> {
    let mut job = load_job(&ctx.store, name).map_err(|e| ExitError::fatal(e.to_string()))?;
    job.enabled = enabled;
    write_job(&ctx.store, &job).map_err(|e| ExitError::fatal(e.to_string()))?;
    println!(
        "{name} is now {}",
        if enabled { "enabled" } else { "disabled" }
    );
    reload_daemon(ctx);
    Ok(())
}

fn reload_daemon(ctx: &Context) {
    if let Err(e) = agx_daemon::signal_reload(&ctx.store) {
        tracing::debug!(error = %e, "daemon not reloaded");
    }
}
