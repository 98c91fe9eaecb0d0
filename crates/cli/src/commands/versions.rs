// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version management: add / remove / use / list.

use super::parse_agent;
use crate::context::Context;
use crate::exit_error::ExitError;
use agx_core::{AgentKind, Manifest, PROJECT_MANIFEST_DIR, REPO_MANIFEST_NAME};
use agx_versions::{parse_spec, VersionSpec};

fn parse(input: &str) -> Result<VersionSpec, ExitError> {
    parse_spec(input)
        .ok_or_else(|| ExitError::fatal(format!("invalid agent spec '{input}'; expected agent[@version]")))
}

pub async fn add(ctx: &Context, spec: &str, project: bool) -> Result<(), ExitError> {
    let spec = parse(spec)?;
    if project {
        return pin_in_project(ctx, spec.agent, &spec.version);
    }

    ctx.store
        .ensure_layout()
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    let versions = ctx.versions();
    let outcome = versions
        .install_version(spec.agent, &spec.version)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    agx_versions::create_shim(&ctx.store, spec.agent)
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    agx_versions::sync_resources_to_version(&ctx.store, spec.agent, &outcome.version)
        .map_err(|e| ExitError::fatal(e.to_string()))?;

    println!("installed {}@{}", spec.agent, outcome.version);
    if outcome.became_default {
        println!("{} default is now {}", spec.agent, outcome.version);
    }
    if !agx_versions::shims_in_path(&ctx.store) {
        println!();
        println!(
            "{}",
            agx_versions::path_instructions(&ctx.store, agx_versions::Shell::detect())
        );
    }
    Ok(())
}

pub async fn remove(ctx: &Context, spec: &str, all: bool) -> Result<(), ExitError> {
    let spec = parse(spec)?;
    let versions = ctx.versions();
    if all {
        versions
            .remove_all_versions(spec.agent)
            .await
            .map_err(|e| ExitError::fatal(e.to_string()))?;
        agx_versions::remove_shim(&ctx.store, spec.agent)
            .map_err(|e| ExitError::fatal(e.to_string()))?;
        println!("removed all {} versions", spec.agent);
        return Ok(());
    }

    versions
        .remove_version(spec.agent, &spec.version)
        .await
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    if versions.list_installed(spec.agent).is_empty() {
        agx_versions::remove_shim(&ctx.store, spec.agent)
            .map_err(|e| ExitError::fatal(e.to_string()))?;
    }
    println!("removed {}@{}", spec.agent, spec.version);
    if let Some(default) = versions.default_version(spec.agent) {
        println!("{} default is now {default}", spec.agent);
    }
    Ok(())
}

pub fn use_version(ctx: &Context, spec: &str, project: bool) -> Result<(), ExitError> {
    let spec = parse(spec)?;
    if project {
        return pin_in_project(ctx, spec.agent, &spec.version);
    }
    ctx.versions()
        .use_version(spec.agent, &spec.version)
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    println!("{} default is now {}", spec.agent, spec.version);
    Ok(())
}

pub fn list(ctx: &Context, agent: Option<&str>) -> Result<(), ExitError> {
    let agents: Vec<AgentKind> = match agent {
        Some(input) => vec![parse_agent(input)?],
        None => AgentKind::ALL.to_vec(),
    };
    let versions = ctx.versions();
    for agent in agents {
        let installed = versions.list_installed(agent);
        if installed.is_empty() {
            println!("{agent}: (none)");
            continue;
        }
        let default = versions.default_version(agent);
        let resolved = versions.resolve_version(
            agent,
            &std::env::current_dir().unwrap_or_default(),
        );
        println!("{agent}:");
        for version in installed {
            let mut marks = String::new();
            if default.as_deref() == Some(&version) {
                marks.push_str(" (default)");
            }
            if resolved.as_deref() == Some(&version) && resolved != default {
                marks.push_str(" (project)");
            }
            println!("  {version}{marks}");
        }
    }
    Ok(())
}

/// Write the version pin into `.agents/agents.yaml` next to the caller.
fn pin_in_project(_ctx: &Context, agent: AgentKind, version: &str) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::fatal(e.to_string()))?;
    let dir = cwd.join(PROJECT_MANIFEST_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| ExitError::fatal(e.to_string()))?;
    let path = dir.join(REPO_MANIFEST_NAME);

    let mut manifest = if path.exists() {
        Manifest::load(&path).map_err(|e| ExitError::fatal(e.to_string()))?
    } else {
        Manifest::default()
    };
    manifest.agents.insert(agent, version.to_string());
    let yaml = serde_yaml::to_string(&manifest).map_err(|e| ExitError::fatal(e.to_string()))?;
    std::fs::write(&path, yaml).map_err(|e| ExitError::fatal(e.to_string()))?;
    println!("pinned {agent}@{version} in {}", path.display());
    Ok(())
}
