// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-repo and per-project declarative manifest (`agents.yaml`).

use crate::agent::AgentKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest file name, at a repo root or inside `.agents/` in a project.
pub const REPO_MANIFEST_NAME: &str = "agents.yaml";
/// Directory holding the per-project manifest.
pub const PROJECT_MANIFEST_DIR: &str = ".agents";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Transport of a declared MCP server. Stdio entries carry a command;
/// http entries carry a url. Registration is stdio-only; http entries are
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpTransport {
    Stdio {
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
    Http {
        url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl McpTransport {
    pub fn is_stdio(&self) -> bool {
        matches!(self, McpTransport::Stdio { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpScope {
    #[default]
    User,
    Project,
}

/// One declared MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpEntry {
    #[serde(flatten)]
    pub transport: McpTransport,
    #[serde(default)]
    pub scope: McpScope,
    /// Agents to register with; empty means every MCP-capable agent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentKind>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMethod {
    #[default]
    Symlink,
    Copy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncScope {
    #[default]
    Global,
    Project,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDefaults {
    #[serde(default)]
    pub method: SyncMethod,
    #[serde(default)]
    pub scope: SyncScope,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project path this drive describes, `~`-relative allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Declarative manifest at a repo root (and, reduced to `agents`, in a
/// project's `.agents/` directory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Agent → pinned version.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub agents: IndexMap<AgentKind, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mcp: IndexMap<String, McpEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<SyncDefaults>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub drives: IndexMap<String, DriveDecl>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_repo(repo_root: &Path) -> Result<Option<Self>, ManifestError> {
        let path = repo_root.join(REPO_MANIFEST_NAME);
        if !path.exists() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }
}

/// Walk upward from `cwd` looking for `.agents/agents.yaml`.
///
/// Returns the manifest and the directory containing `.agents/`. Absence is
/// normal and reported as `Ok(None)`; a present-but-invalid manifest is an
/// error so pinning mistakes don't silently fall back to globals.
pub fn find_project_manifest(cwd: &Path) -> Result<Option<(PathBuf, Manifest)>, ManifestError> {
    let mut dir = Some(cwd);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_MANIFEST_DIR).join(REPO_MANIFEST_NAME);
        if candidate.is_file() {
            let manifest = Manifest::load(&candidate)?;
            return Ok(Some((current.to_path_buf(), manifest)));
        }
        dir = current.parent();
    }
    Ok(None)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
