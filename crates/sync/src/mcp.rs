// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MCP server registration against agent config trees.
//!
//! Registration is stdio-only; http entries pass through unregistered.
//! Strategy is keyed by agent: claude and gemini expose an `mcp add`
//! subcommand, codex takes a direct `config.toml` edit, cursor and
//! windsurf take a direct `mcp.json` edit. The target HOME decides which
//! install is affected: a version's isolated home, or the real one.

use crate::error::{io_err, SyncError};
use agx_adapters::{ProcessRequest, ProcessRunner};
use agx_core::{AgentKind, McpEntry, McpTransport};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum Strategy {
    /// `<cli> mcp add ...` / `<cli> mcp remove ...`
    Subcommand,
    /// Direct edit of `{config_dir}/config.toml` (codex).
    ConfigToml,
    /// Direct edit of `{config_dir}/mcp.json` (cursor, windsurf).
    McpJson,
}

fn strategy(agent: AgentKind) -> Strategy {
    match agent {
        AgentKind::Claude | AgentKind::Gemini => Strategy::Subcommand,
        AgentKind::Codex => Strategy::ConfigToml,
        AgentKind::Cursor | AgentKind::Windsurf => Strategy::McpJson,
    }
}

fn config_toml_path(agent: AgentKind, home: &Path) -> PathBuf {
    home.join(agent.info().config_dir).join("config.toml")
}

fn mcp_json_path(agent: AgentKind, home: &Path) -> PathBuf {
    home.join(agent.info().config_dir).join("mcp.json")
}

/// Register one stdio MCP server with an agent whose HOME is `home`.
/// Http entries are skipped (passthrough) and report success.
pub async fn register_mcp(
    runner: &Arc<dyn ProcessRunner>,
    agent: AgentKind,
    home: &Path,
    name: &str,
    entry: &McpEntry,
) -> Result<(), SyncError> {
    let McpTransport::Stdio { command, args } = &entry.transport else {
        return Ok(());
    };

    match strategy(agent) {
        Strategy::Subcommand => {
            let mut argv: Vec<String> = vec!["mcp".into(), "add".into()];
            if agent == AgentKind::Claude {
                argv.push("--scope".into());
                argv.push("user".into());
            }
            for (key, value) in &entry.env {
                argv.push("-e".into());
                argv.push(format!("{key}={value}"));
            }
            argv.push(name.into());
            argv.push(command.clone());
            argv.extend(args.iter().cloned());
            run_agent_cli(runner, agent, home, argv).await
        }
        Strategy::ConfigToml => {
            add_to_config_toml(agent, home, name, command, args, &entry.env)
        }
        Strategy::McpJson => add_to_mcp_json(agent, home, name, command, args, &entry.env),
    }
}

/// Unregister a server by name.
pub async fn unregister_mcp(
    runner: &Arc<dyn ProcessRunner>,
    agent: AgentKind,
    home: &Path,
    name: &str,
) -> Result<(), SyncError> {
    match strategy(agent) {
        Strategy::Subcommand => {
            run_agent_cli(
                runner,
                agent,
                home,
                vec!["mcp".into(), "remove".into(), name.into()],
            )
            .await
        }
        Strategy::ConfigToml => remove_from_config_toml(agent, home, name),
        Strategy::McpJson => remove_from_mcp_json(agent, home, name),
    }
}

/// Names currently registered in a file-based agent config. Subcommand
/// agents track their own registrations and are not covered here.
pub fn registered_mcp_names(agent: AgentKind, home: &Path) -> Vec<String> {
    match strategy(agent) {
        Strategy::ConfigToml => read_config_toml(agent, home)
            .ok()
            .and_then(|doc| {
                doc.get("mcp_servers")
                    .and_then(|v| v.as_table())
                    .map(|t| t.keys().cloned().collect())
            })
            .unwrap_or_default(),
        Strategy::McpJson => read_mcp_json(agent, home)
            .ok()
            .and_then(|doc| {
                doc.get("mcpServers")
                    .and_then(|v| v.as_object())
                    .map(|o| o.keys().cloned().collect())
            })
            .unwrap_or_default(),
        Strategy::Subcommand => Vec::new(),
    }
}

async fn run_agent_cli(
    runner: &Arc<dyn ProcessRunner>,
    agent: AgentKind,
    home: &Path,
    argv: Vec<String>,
) -> Result<(), SyncError> {
    let mut envs = HashMap::new();
    envs.insert("HOME".to_string(), home.display().to_string());
    let request = ProcessRequest::new(agent.info().cli_name, &[])
        .args(argv)
        .envs(envs);
    let output = runner
        .run(request)
        .await
        .map_err(|e| SyncError::McpRegistration {
            agent,
            summary: e.to_string(),
        })?;
    if !output.success() {
        return Err(SyncError::McpRegistration {
            agent,
            summary: output.failure_summary(),
        });
    }
    Ok(())
}

fn read_config_toml(agent: AgentKind, home: &Path) -> Result<toml::Table, SyncError> {
    let path = config_toml_path(agent, home);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
        Err(e) => return Err(io_err("read", &path, e)),
    };
    content.parse::<toml::Table>().map_err(|e| SyncError::Io {
        action: "parse",
        path,
        source: std::io::Error::other(e),
    })
}

fn write_config_toml(agent: AgentKind, home: &Path, doc: &toml::Table) -> Result<(), SyncError> {
    let path = config_toml_path(agent, home);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
    }
    std::fs::write(&path, doc.to_string()).map_err(|e| io_err("write", &path, e))
}

fn add_to_config_toml(
    agent: AgentKind,
    home: &Path,
    name: &str,
    command: &str,
    args: &[String],
    env: &std::collections::BTreeMap<String, String>,
) -> Result<(), SyncError> {
    let mut doc = read_config_toml(agent, home)?;
    let servers = doc
        .entry("mcp_servers".to_string())
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(servers) = servers.as_table_mut() else {
        return Err(SyncError::McpRegistration {
            agent,
            summary: "mcp_servers is not a table".to_string(),
        });
    };

    let mut server = toml::Table::new();
    server.insert("command".into(), toml::Value::String(command.to_string()));
    if !args.is_empty() {
        server.insert(
            "args".into(),
            toml::Value::Array(
                args.iter()
                    .map(|a| toml::Value::String(a.clone()))
                    .collect(),
            ),
        );
    }
    if !env.is_empty() {
        let mut env_table = toml::Table::new();
        for (k, v) in env {
            env_table.insert(k.clone(), toml::Value::String(v.clone()));
        }
        server.insert("env".into(), toml::Value::Table(env_table));
    }
    servers.insert(name.to_string(), toml::Value::Table(server));
    write_config_toml(agent, home, &doc)
}

fn remove_from_config_toml(agent: AgentKind, home: &Path, name: &str) -> Result<(), SyncError> {
    let mut doc = read_config_toml(agent, home)?;
    if let Some(servers) = doc.get_mut("mcp_servers").and_then(|v| v.as_table_mut()) {
        servers.remove(name);
    }
    write_config_toml(agent, home, &doc)
}

fn read_mcp_json(agent: AgentKind, home: &Path) -> Result<serde_json::Value, SyncError> {
    let path = mcp_json_path(agent, home);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(json!({})),
        Err(e) => return Err(io_err("read", &path, e)),
    };
    serde_json::from_str(&content).map_err(|e| SyncError::Io {
        action: "parse",
        path,
        source: std::io::Error::other(e),
    })
}

fn write_mcp_json(
    agent: AgentKind,
    home: &Path,
    doc: &serde_json::Value,
) -> Result<(), SyncError> {
    let path = mcp_json_path(agent, home);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
    }
    let body = serde_json::to_string_pretty(doc).map_err(|e| SyncError::Io {
        action: "write",
        path: path.clone(),
        source: std::io::Error::other(e),
    })?;
    std::fs::write(&path, body).map_err(|e| io_err("write", &path, e))
}

fn add_to_mcp_json(
    agent: AgentKind,
    home: &Path,
    name: &str,
    command: &str,
    args: &[String],
    env: &std::collections::BTreeMap<String, String>,
) -> Result<(), SyncError> {
    let mut doc = read_mcp_json(agent, home)?;
    let mut server = json!({ "command": command });
    if !args.is_empty() {
        server["args"] = json!(args);
    }
    if !env.is_empty() {
        server["env"] = json!(env);
    }
    doc["mcpServers"][name] = server;
    write_mcp_json(agent, home, &doc)
}

fn remove_from_mcp_json(agent: AgentKind, home: &Path, name: &str) -> Result<(), SyncError> {
    let mut doc = read_mcp_json(agent, home)?;
    if let Some(servers) = doc.get_mut("mcpServers").and_then(|v| v.as_object_mut()) {
        servers.remove(name);
    }
    write_mcp_json(agent, home, &doc)
}

#[cfg(test)]
#[path = "mcp_tests.rs"]
mod tests;
