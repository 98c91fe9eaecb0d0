// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx pull`: run the sync engine.

use super::parse_agent;
use crate::context::{Context, DaemonReload};
use crate::exit_error::ExitError;
use agx_adapters::{AutoInteract, Interact, TerminalInteract};
use agx_sync::{SyncEngine, SyncOptions, SyncOutcome, SyncSummary};
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct PullArgs {
    /// Repo source (gh:owner/repo, URL, or local path); defaults to the
    /// active repo slot
    pub source: Option<String>,
    /// Keep local content on every conflict
    #[arg(long)]
    pub yes: bool,
    /// Overwrite local content on every conflict
    #[arg(long)]
    pub force: bool,
    /// Classify and report without changing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Also unregister MCP servers missing from the manifest
    #[arg(long)]
    pub clean: bool,
    /// Skip agent CLI installs
    #[arg(long)]
    pub skip_clis: bool,
    /// Skip MCP registration
    #[arg(long)]
    pub skip_mcp: bool,
    /// Repo slot to sync
    #[arg(long)]
    pub scope: Option<String>,
    /// Restrict to specific agents (repeatable)
    #[arg(long = "agent")]
    pub agents: Vec<String>,
}

pub async fn run(ctx: &Context, args: PullArgs) -> Result<(), ExitError> {
    let mut agents = Vec::new();
    for input in &args.agents {
        agents.push(parse_agent(input)?);
    }

    let interact: Arc<dyn Interact> = if args.yes {
        Arc::new(AutoInteract::skip_conflicts())
    } else if args.force {
        Arc::new(AutoInteract::overwrite_all())
    } else {
        Arc::new(TerminalInteract)
    };

    let engine = SyncEngine::new(
        ctx.store.clone(),
        ctx.git.clone(),
        ctx.runner.clone(),
        interact,
        Arc::new(DaemonReload {
            store: ctx.store.clone(),
        }),
        ctx.clock.clone(),
        ctx.user_home.clone(),
    );

    let options = SyncOptions {
        slot: args.scope,
        source: args.source,
        yes: args.yes,
        force: args.force,
        dry_run: args.dry_run,
        clean: args.clean,
        skip_clis: args.skip_clis,
        skip_mcp: args.skip_mcp,
        agents,
    };

    match engine.sync(&options).await {
        Ok(SyncOutcome::Completed(summary)) => {
            print_summary(&summary, args.dry_run);
            Ok(())
        }
        Ok(SyncOutcome::Cancelled) => Err(ExitError::cancelled()),
        Err(e) => Err(ExitError::fatal(e.to_string())),
    }
}

fn print_summary(summary: &SyncSummary, dry_run: bool) {
    let verb = if dry_run { "would install" } else { "installed" };
    println!(
        "synced {} @ {}",
        summary.slot,
        if summary.commit.is_empty() {
            "?"
        } else {
            &summary.commit
        }
    );
    if !summary.clis_installed.is_empty() {
        println!("  clis: {}", summary.clis_installed.join(", "));
    }
    if !summary.new_installed.is_empty() {
        println!("  {verb} {} new", summary.new_installed.len());
        for item in &summary.new_installed {
            println!("    + {item}");
        }
    }
    if !summary.overwritten.is_empty() {
        println!("  overwrote {}", summary.overwritten.len());
        for item in &summary.overwritten {
            println!("    ~ {item}");
        }
    }
    if !summary.skipped.is_empty() {
        println!("  kept local {}", summary.skipped.len());
    }
    if !summary.in_sync.is_empty() {
        println!("  in sync {}", summary.in_sync.len());
    }
    if !summary.mcp_registered.is_empty() {
        println!("  mcp: {}", summary.mcp_registered.join(", "));
    }
    if !summary.jobs_installed.is_empty() {
        println!("  jobs: {}", summary.jobs_installed.join(", "));
    }
    if !summary.drives_installed.is_empty() {
        println!("  drives: {}", summary.drives_installed.join(", "));
    }
    if !summary.failures.is_empty() {
        println!("  {} failure(s):", summary.failures.len());
        for (item, error) in &summary.failures {
            println!("    ! {item}: {error}");
        }
    }
}
