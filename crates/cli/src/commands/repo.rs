// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx repo`: manage repo slots.

use crate::context::Context;
use crate::exit_error::ExitError;
use agx_core::{RepoRecord, RepoRef};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum RepoCmd {
    /// List repo slots by priority
    List,
    /// Add or update a repo slot
    Add {
        source: String,
        /// Slot name; defaults to `user`
        #[arg(long)]
        slot: Option<String>,
    },
    /// Remove a repo slot
    Remove { slot: String },
}

pub async fn run(ctx: &Context, cmd: RepoCmd) -> Result<(), ExitError> {
    match cmd {
        RepoCmd::List => {
            let repos = ctx.store.repos_by_priority();
            if repos.is_empty() {
                println!("no repos configured");
                return Ok(());
            }
            for (slot, record) in repos {
                let ro = if record.readonly { " [readonly]" } else { "" };
                println!(
                    "{:<4} {slot:<10} {} @ {}{ro}",
                    record.priority, record.source, record.branch
                );
            }
            Ok(())
        }
        RepoCmd::Add { source, slot } => {
            let parsed =
                RepoRef::parse(&source).map_err(|e| ExitError::fatal(e.to_string()))?;
            let slot = slot.unwrap_or_else(|| agx_core::USER_SLOT.to_string());
            let meta = ctx.store.read_meta();
            let priority = meta
                .repos
                .get(&slot)
                .map(|r| r.priority)
                .or_else(|| agx_core::Meta::reserved_priority(&slot))
                .unwrap_or_else(|| meta.next_slot_priority());
            let record = RepoRecord {
                source: source.clone(),
                branch: parsed.branch().to_string(),
                commit: String::new(),
                last_sync: String::new(),
                priority,
                readonly: false,
            };
            ctx.store
                .set_repo(&slot, record)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("{slot} -> {source}");
            Ok(())
        }
        RepoCmd::Remove { slot } => {
            let record = ctx
                .store
                .get_repo(&slot)
                .ok_or_else(|| ExitError::fatal(format!("repo slot '{slot}' not found")))?;
            if record.readonly {
                return Err(ExitError::fatal(format!("repo slot '{slot}' is readonly")));
            }
            ctx.store
                .remove_repo(&slot)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            let checkout = ctx.store.repos_dir().join(&slot);
            if checkout.is_dir() {
                let _ = std::fs::remove_dir_all(&checkout);
            }
            println!("removed repo slot {slot}");
            Ok(())
        }
    }
}
