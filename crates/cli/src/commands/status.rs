// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx status`: one screen of install state.

use super::parse_agent;
use crate::context::Context;
use crate::exit_error::ExitError;
use agx_adapters::{HttpRegistryClient, RegistryClient};
use agx_core::AgentKind;

pub async fn run(ctx: &Context, agent: Option<&str>) -> Result<(), ExitError> {
    let agents: Vec<AgentKind> = match agent {
        Some(input) => vec![parse_agent(input)?],
        None => AgentKind::ALL.to_vec(),
    };

    let versions = ctx.versions();
    println!("agents:");
    for agent in agents {
        let installed = versions.list_installed(agent);
        let default = versions.default_version(agent);
        let line = match (&installed[..], default) {
            ([], _) => "not installed".to_string(),
            (list, Some(default)) => format!(
                "{} (default {default})",
                list.join(", ")
            ),
            (list, None) => list.join(", "),
        };
        println!("  {:<10} {line}", agent.to_string());
    }

    let repos = ctx.store.repos_by_priority();
    if repos.is_empty() {
        println!("repos: none configured (run `agx pull <source>`)");
    } else {
        println!("repos:");
        for (slot, record) in repos {
            let sync = if record.last_sync.is_empty() {
                "never synced".to_string()
            } else {
                format!("synced {} @ {}", record.last_sync, record.commit)
            };
            let ro = if record.readonly { " [readonly]" } else { "" };
            println!("  {slot:<10} {} ({sync}){ro}", record.source);
        }
    }

    match agx_daemon::is_running(&ctx.store) {
        Some(pid) => println!("daemon: running (pid {pid})"),
        None => println!("daemon: not running"),
    }

    if !agx_versions::shims_in_path(&ctx.store) {
        let shell = agx_versions::Shell::detect();
        println!();
        println!("{}", agx_versions::path_instructions(&ctx.store, shell));
    }

    // Best-effort update hint; failures stay silent.
    if let Some(latest) = HttpRegistryClient::new().latest_cli_version().await {
        if latest != env!("CARGO_PKG_VERSION") {
            println!();
            println!("update available: {latest} (installed {})", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
