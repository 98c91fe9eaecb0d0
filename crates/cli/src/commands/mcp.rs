// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx mcp`: register and unregister MCP servers by hand.

use super::parse_agent;
use crate::context::Context;
use crate::exit_error::ExitError;
use agx_core::{Capability, McpEntry, McpScope, McpTransport};
use clap::Subcommand;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum McpCmd {
    /// Register a stdio MCP server with agents
    Add {
        name: String,
        command: String,
        /// Arguments passed to the server command
        #[arg(last = true)]
        args: Vec<String>,
        /// Target agents (repeatable); defaults to every MCP-capable agent
        #[arg(long = "agent")]
        agents: Vec<String>,
        /// KEY=VALUE environment for the server (repeatable)
        #[arg(short, long = "env")]
        env: Vec<String>,
    },
    /// Unregister an MCP server
    Remove {
        name: String,
        /// Target agents (repeatable); defaults to every MCP-capable agent
        #[arg(long = "agent")]
        agents: Vec<String>,
    },
    /// List file-registered MCP servers per agent
    List,
}

pub async fn run(ctx: &Context, cmd: McpCmd) -> Result<(), ExitError> {
    match cmd {
        McpCmd::Add {
            name,
            command,
            args,
            agents,
            env,
        } => {
            let agents = resolve_agents(&agents)?;
            let mut env_map = BTreeMap::new();
            for pair in env {
                let Some((key, value)) = pair.split_once('=') else {
                    return Err(ExitError::fatal(format!(
                        "invalid --env '{pair}'; expected KEY=VALUE"
                    )));
                };
                env_map.insert(key.to_string(), value.to_string());
            }
            let entry = McpEntry {
                transport: McpTransport::Stdio {
                    command,
                    args,
                },
                scope: McpScope::User,
                agents: agents.clone(),
                env: env_map,
            };

            let runner: std::sync::Arc<dyn agx_adapters::ProcessRunner> = ctx.runner.clone();
            let mut failures = Vec::new();
            for agent in agents {
                let home = mcp_home(ctx, agent);
                match agx_sync::register_mcp(&runner, agent, &home, &name, &entry).await {
                    Ok(()) => println!("registered {name} with {agent}"),
                    Err(e) => failures.push(format!("{agent}: {e}")),
                }
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(ExitError::fatal(failures.join("; ")))
            }
        }
        McpCmd::Remove { name, agents } => {
            let agents = resolve_agents(&agents)?;
            let runner: std::sync::Arc<dyn agx_adapters::ProcessRunner> = ctx.runner.clone();
            let mut failures = Vec::new();
            for agent in agents {
                let home = mcp_home(ctx, agent);
                match agx_sync::unregister_mcp(&runner, agent, &home, &name).await {
                    Ok(()) => println!("unregistered {name} from {agent}"),
                    Err(e) => failures.push(format!("{agent}: {e}")),
                }
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(ExitError::fatal(failures.join("; ")))
            }
        }
        McpCmd::List => {
            for agent in agx_core::AgentKind::ALL {
                if !agent.supports(Capability::Mcp) {
                    continue;
                }
                let home = mcp_home(ctx, agent);
                let names = agx_sync::registered_mcp_names(agent, &home);
                if !names.is_empty() {
                    println!("{agent}: {}", names.join(", "));
                }
            }
            Ok(())
        }
    }
}

fn resolve_agents(inputs: &[String]) -> Result<Vec<agx_core::AgentKind>, ExitError> {
    if inputs.is_empty() {
        return Ok(agx_core::AgentKind::ALL
            .into_iter()
            .filter(|a| a.supports(Capability::Mcp))
            .collect());
    }
    inputs.iter().map(|s| parse_agent(s)).collect()
}

/// Registration home: the default version's isolated home when the agent
/// is version-managed, else the real home.
fn mcp_home(ctx: &Context, agent: agx_core::AgentKind) -> PathBuf {
    let versions = ctx.versions();
    if let Some(version) = versions.default_version(agent) {
        if versions.is_installed(agent, &version) {
            return versions.home_dir(agent, &version);
        }
    }
    ctx.user_home.clone()
}
