// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::spec::ValidationError;
use agx_core::AgentKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job '{0}' not found")]
    NotFound(String),
    #[error("{agent} is not supported for daemon jobs")]
    UnsupportedAgent { agent: AgentKind },
    #[error("invalid job '{name}': {}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid {
        name: String,
        errors: Vec<ValidationError>,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize job: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(action: &'static str, path: &std::path::Path, source: std::io::Error) -> JobError {
    JobError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
