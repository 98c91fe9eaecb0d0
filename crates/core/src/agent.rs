// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of managed coding agents and their static descriptors.

use serde::{Deserialize, Serialize};

/// Conventional cross-agent instructions file name. Memory files with this
/// name are renamed to the agent's own instructions file at link time.
pub const SHARED_INSTRUCTIONS: &str = "AGENTS.md";

/// One of the five supported coding agent CLIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Claude,
    Codex,
    Gemini,
    Cursor,
    Windsurf,
}

crate::simple_display! {
    AgentKind {
        Claude => "claude",
        Codex => "codex",
        Gemini => "gemini",
        Cursor => "cursor",
        Windsurf => "windsurf",
    }
}

/// On-disk format of an agent's command files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFormat {
    Markdown,
    Toml,
}

/// Optional features an agent's config tree understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Hooks,
    Mcp,
    Skills,
    Allowlist,
}

/// Static descriptor for an agent kind.
pub struct AgentInfo {
    /// Human-facing name ("Claude Code").
    pub display_name: &'static str,
    /// Executable name on PATH.
    pub cli_name: &'static str,
    /// Upstream npm package, when the agent installs via npm.
    pub package: Option<&'static str>,
    /// Config directory basename under HOME (".claude").
    pub config_dir: &'static str,
    /// Subdirectory for command files inside the config dir.
    pub commands_subdir: &'static str,
    /// Instructions file the agent reads ("CLAUDE.md").
    pub instructions_file: &'static str,
    pub command_format: CommandFormat,
    pub capabilities: &'static [Capability],
}

const CLAUDE: AgentInfo = AgentInfo {
    display_name: "Claude Code",
    cli_name: "claude",
    package: Some("@anthropic-ai/claude-code"),
    config_dir: ".claude",
    commands_subdir: "commands",
    instructions_file: "CLAUDE.md",
    command_format: CommandFormat::Markdown,
    capabilities: &[
        Capability::Hooks,
        Capability::Mcp,
        Capability::Skills,
        Capability::Allowlist,
    ],
};

const CODEX: AgentInfo = AgentInfo {
    display_name: "Codex CLI",
    cli_name: "codex",
    package: Some("@openai/codex"),
    config_dir: ".codex",
    commands_subdir: "prompts",
    instructions_file: "AGENTS.md",
    command_format: CommandFormat::Toml,
    capabilities: &[Capability::Mcp],
};

const GEMINI: AgentInfo = AgentInfo {
    display_name: "Gemini CLI",
    cli_name: "gemini",
    package: Some("@google/gemini-cli"),
    config_dir: ".gemini",
    commands_subdir: "commands",
    instructions_file: "GEMINI.md",
    command_format: CommandFormat::Markdown,
    capabilities: &[Capability::Mcp],
};

const CURSOR: AgentInfo = AgentInfo {
    display_name: "Cursor CLI",
    cli_name: "cursor-agent",
    package: None,
    config_dir: ".cursor",
    commands_subdir: "commands",
    instructions_file: "AGENTS.md",
    command_format: CommandFormat::Markdown,
    capabilities: &[Capability::Mcp],
};

const WINDSURF: AgentInfo = AgentInfo {
    display_name: "Windsurf CLI",
    cli_name: "windsurf",
    package: None,
    config_dir: ".windsurf",
    commands_subdir: "commands",
    instructions_file: "AGENTS.md",
    command_format: CommandFormat::Markdown,
    capabilities: &[Capability::Mcp],
};

impl AgentKind {
    /// Every supported agent, in display order.
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Claude,
        AgentKind::Codex,
        AgentKind::Gemini,
        AgentKind::Cursor,
        AgentKind::Windsurf,
    ];

    /// Agents that support programmatic one-shot execution (daemon jobs).
    pub const DAEMON: [AgentKind; 3] = [AgentKind::Claude, AgentKind::Codex, AgentKind::Gemini];

    /// Parse an agent id string. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<AgentKind> {
        match s.trim() {
            "claude" => Some(AgentKind::Claude),
            "codex" => Some(AgentKind::Codex),
            "gemini" => Some(AgentKind::Gemini),
            "cursor" => Some(AgentKind::Cursor),
            "windsurf" => Some(AgentKind::Windsurf),
            _ => None,
        }
    }

    pub fn info(&self) -> &'static AgentInfo {
        match self {
            AgentKind::Claude => &CLAUDE,
            AgentKind::Codex => &CODEX,
            AgentKind::Gemini => &GEMINI,
            AgentKind::Cursor => &CURSOR,
            AgentKind::Windsurf => &WINDSURF,
        }
    }

    pub fn supports(&self, cap: Capability) -> bool {
        self.info().capabilities.contains(&cap)
    }

    /// True when the agent can run daemon jobs.
    pub fn supports_jobs(&self) -> bool {
        Self::DAEMON.contains(self)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
