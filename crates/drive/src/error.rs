// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("drive '{0}' not found")]
    NotFound(String),
    #[error("drive '{0}' already exists")]
    AlreadyExists(String),
    #[error("file '{file}' not found in drive '{drive}'")]
    FileNotFound { drive: String, file: String },
    #[error("section '{0}' not found")]
    SectionNotFound(String),
    #[error("mq failed: {0}")]
    Mq(String),
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(action: &'static str, path: &std::path::Path, source: std::io::Error) -> DriveError {
    DriveError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
