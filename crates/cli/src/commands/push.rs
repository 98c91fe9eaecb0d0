// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx push`: export central resources into the repo checkout and push.

use crate::context::Context;
use crate::exit_error::ExitError;
use agx_adapters::GitAdapter;
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct PushArgs {
    /// Repo slot to push; defaults to the active slot
    #[arg(long)]
    pub scope: Option<String>,
    /// Export into the checkout without committing or pushing
    #[arg(long)]
    pub export_only: bool,
    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,
}

pub async fn run(ctx: &Context, args: PushArgs) -> Result<(), ExitError> {
    let (slot, record) = match &args.scope {
        Some(slot) => {
            let record = ctx
                .store
                .get_repo(slot)
                .ok_or_else(|| ExitError::fatal(format!("repo slot '{slot}' not found")))?;
            (slot.clone(), record)
        }
        None => ctx
            .store
            .highest_priority_repo()
            .ok_or_else(|| ExitError::fatal("no repo configured; run `agx pull <source>` first"))?,
    };

    if record.readonly {
        return Err(ExitError::fatal(format!(
            "repo slot '{slot}' is readonly"
        )));
    }

    let checkout = ctx.store.repos_dir().join(&slot);
    if !checkout.join(".git").is_dir() && !args.export_only {
        return Err(ExitError::fatal(format!(
            "repo slot '{slot}' has no checkout; run `agx pull` first"
        )));
    }

    export_central(ctx, &checkout)?;
    println!("exported central resources into {}", checkout.display());

    if args.export_only {
        return Ok(());
    }

    let status = ctx
        .git
        .status_porcelain(&checkout)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    if status.trim().is_empty() {
        println!("nothing to push");
        return Ok(());
    }

    let message = args
        .message
        .unwrap_or_else(|| "Update agent resources".to_string());
    ctx.git
        .add_all(&checkout)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    ctx.git
        .commit(&checkout, &message)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    ctx.git
        .push(&checkout)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    println!("pushed {slot}");
    Ok(())
}

/// Copy the central store into the repo's layout.
fn export_central(ctx: &Context, checkout: &Path) -> Result<(), ExitError> {
    let pairs = [
        (ctx.store.commands_dir(), checkout.join("shared/commands")),
        (ctx.store.skills_dir(), checkout.join("skills")),
        (ctx.store.hooks_dir(), checkout.join("hooks")),
        (ctx.store.memory_dir(), checkout.join("memory")),
        (ctx.store.jobs_dir(), checkout.join("jobs")),
        (ctx.store.drives_dir(), checkout.join("drives")),
    ];
    for (source, target) in pairs {
        if !source.is_dir() {
            continue;
        }
        copy_tree(&source, &target)
            .map_err(|e| ExitError::fatal(format!("export {}: {e}", source.display())))?;
    }
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(target)?;
    for entry in std::fs::read_dir(source)?.flatten() {
        let path = entry.path();
        let dest = target.join(entry.file_name());
        if path.is_dir() {
            // Per-job overlay homes live next to job files; never export them
            if path.join("home").is_dir() || entry.file_name() == "home" {
                continue;
            }
            copy_tree(&path, &dest)?;
        } else {
            std::fs::copy(&path, &dest)?;
        }
    }
    Ok(())
}
