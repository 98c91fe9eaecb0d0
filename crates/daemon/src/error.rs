// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("daemon is not running")]
    NotRunning,
    #[error("daemon did not come up within {0:?}")]
    StartTimeout(std::time::Duration),
    #[error(transparent)]
    Job(#[from] agx_jobs::JobError),
    #[error(transparent)]
    Store(#[from] agx_store::StoreError),
    #[error("invalid schedule for job '{job}': {reason}")]
    Schedule { job: String, reason: String },
    #[error("failed to signal pid {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(action: &'static str, path: &std::path::Path, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
