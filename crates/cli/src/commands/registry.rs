// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx registry` / `agx search` / `agx install`.

use crate::context::Context;
use crate::exit_error::ExitError;
use agx_adapters::{HttpRegistryClient, RegistryClient};
use agx_core::{RegistryEntry, RegistryKind};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum RegistryCmd {
    /// List configured registries
    List,
    /// Add or update a registry
    Add {
        /// mcp or skill
        kind: String,
        name: String,
        url: String,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Remove a registry
    Remove {
        /// mcp or skill
        kind: String,
        name: String,
    },
}

fn parse_kind(input: &str) -> Result<RegistryKind, ExitError> {
    match input {
        "mcp" => Ok(RegistryKind::Mcp),
        "skill" => Ok(RegistryKind::Skill),
        other => Err(ExitError::fatal(format!(
            "unknown registry kind '{other}'; expected mcp or skill"
        ))),
    }
}

pub fn run(ctx: &Context, cmd: RegistryCmd) -> Result<(), ExitError> {
    match cmd {
        RegistryCmd::List => {
            let meta = ctx.store.read_meta();
            if meta.registries.is_empty() {
                println!("no registries configured");
                return Ok(());
            }
            for (kind, registries) in &meta.registries {
                for (name, entry) in registries {
                    let state = if entry.enabled { "" } else { " (disabled)" };
                    println!("{kind:<6} {name:<16} {}{state}", entry.url);
                }
            }
            Ok(())
        }
        RegistryCmd::Add {
            kind,
            name,
            url,
            api_key,
        } => {
            let kind = parse_kind(&kind)?;
            let mut meta = ctx.store.read_meta();
            meta.registries.entry(kind).or_default().insert(
                name.clone(),
                RegistryEntry {
                    url,
                    enabled: true,
                    api_key,
                },
            );
            ctx.store
                .write_meta(&meta)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("added {kind} registry {name}");
            Ok(())
        }
        RegistryCmd::Remove { kind, name } => {
            let kind = parse_kind(&kind)?;
            let mut meta = ctx.store.read_meta();
            let removed = meta
                .registries
                .get_mut(&kind)
                .and_then(|r| r.remove(&name))
                .is_some();
            if !removed {
                return Err(ExitError::fatal(format!(
                    "{kind} registry '{name}' not found"
                )));
            }
            ctx.store
                .write_meta(&meta)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("removed {kind} registry {name}");
            Ok(())
        }
    }
}

/// Search every enabled registry of a kind; per-registry failures are
/// reported inline and do not abort the rest.
pub async fn search(ctx: &Context, kind: &str, query: &str) -> Result<(), ExitError> {
    let kind = parse_kind(kind)?;
    let registries = enabled_registries(ctx, kind)?;
    let client = HttpRegistryClient::new();

    let mut any = false;
    for (name, entry) in registries {
        match client
            .search(kind, &entry.url, query, entry.api_key.as_deref())
            .await
        {
            Ok(hits) => {
                for hit in hits {
                    any = true;
                    match hit.version {
                        Some(v) => println!("{:<24} {v:<10} {}", hit.name, hit.description),
                        None => println!("{:<24} {}", hit.name, hit.description),
                    }
                }
            }
            Err(e) => eprintln!("registry {name}: {e}"),
        }
    }
    if !any {
        println!("no results for '{query}'");
    }
    Ok(())
}

/// Resolve a package and install it: MCP servers register with agents,
/// skills land in the central store.
pub async fn install(ctx: &Context, kind: &str, name: &str) -> Result<(), ExitError> {
    let kind = parse_kind(kind)?;
    let registries = enabled_registries(ctx, kind)?;
    let client = HttpRegistryClient::new();

    for (registry_name, entry) in registries {
        match client
            .resolve(kind, &entry.url, name, entry.api_key.as_deref())
            .await
        {
            Ok(package) => {
                println!(
                    "found {} in {registry_name}: {}",
                    package.name, package.url
                );
                match kind {
                    RegistryKind::Skill => {
                        // Skills resolve to a git source; pull it through
                        // the normal sync path.
                        println!(
                            "install it with: agx pull {} --scope skills-{}",
                            package.url, package.name
                        );
                    }
                    RegistryKind::Mcp => {
                        println!(
                            "register it with: agx mcp add {} {}",
                            package.name, package.url
                        );
                    }
                }
                return Ok(());
            }
            Err(agx_adapters::RegistryError::NotFound(_)) => continue,
            Err(e) => eprintln!("registry {registry_name}: {e}"),
        }
    }
    Err(ExitError::fatal(format!(
        "package '{name}' not found in any configured {kind} registry"
    )))
}

fn enabled_registries(
    ctx: &Context,
    kind: RegistryKind,
) -> Result<Vec<(String, RegistryEntry)>, ExitError> {
    let meta = ctx.store.read_meta();
    let registries: Vec<(String, RegistryEntry)> = meta
        .registries
        .get(&kind)
        .map(|r| {
            r.iter()
                .filter(|(_, e)| e.enabled)
                .map(|(n, e)| (n.clone(), e.clone()))
                .collect()
        })
        .unwrap_or_default();
    if registries.is_empty() {
        return Err(ExitError::fatal(format!(
            "no {kind} registries configured; add one with `agx registry add {kind} <name> <url>`"
        )));
    }
    Ok(registries)
}
