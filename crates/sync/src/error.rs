// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no repo configured; run `agx repo add <source>` first")]
    NoRepo,
    #[error("repo slot '{0}' not found")]
    UnknownSlot(String),
    #[error("invalid repo source: {0}")]
    Source(#[from] agx_core::RepoParseError),
    #[error(transparent)]
    Git(#[from] agx_adapters::GitError),
    #[error(transparent)]
    Store(#[from] agx_store::StoreError),
    #[error(transparent)]
    Manifest(#[from] agx_core::ManifestError),
    #[error("mcp registration for {agent} failed: {summary}")]
    McpRegistration { agent: agx_core::AgentKind, summary: String },
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(action: &'static str, path: &std::path::Path, source: std::io::Error) -> SyncError {
    SyncError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
