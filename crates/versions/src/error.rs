// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use agx_core::AgentKind;
use agx_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("{0} has no installable package; install the CLI manually and keep it on PATH")]
    NotInstallable(AgentKind),
    #[error("failed to install {agent}@{version}: {summary}")]
    InstallFailed {
        agent: AgentKind,
        version: String,
        summary: String,
    },
    #[error("{agent}@{version} is not installed")]
    NotInstalled { agent: AgentKind, version: String },
    #[error("could not read installed package metadata at {0}")]
    MissingPackageMeta(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(action: &'static str, path: &std::path::Path, source: std::io::Error) -> VersionError {
    VersionError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
