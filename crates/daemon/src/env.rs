// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filtered spawn environment for job children.
//!
//! Children start from an allowlist of safe variables rather than the
//! full daemon environment, so agent credentials and cloud keys in the
//! parent never reach a sandboxed run. HOME always points at the overlay.

use std::collections::HashMap;
use std::path::Path;

/// Variables copied from the parent environment when present.
const SAFE_VARS: &[&str] = &[
    "PATH",
    "SHELL",
    "LANG",
    "LANGUAGE",
    "LC_ALL",
    "LC_CTYPE",
    "TERM",
    "USER",
    "LOGNAME",
    "TMPDIR",
    "TZ",
    "COLUMNS",
    "LINES",
    "AGX_HOME",
];

/// Build the environment for a job child with HOME at the overlay.
///
/// Everything not on the allowlist is dropped, which covers
/// ANTHROPIC_API_KEY, OPENAI_API_KEY, AWS_*, SSH_AUTH_SOCK, and whatever
/// else the parent shell happens to carry.
pub fn build_spawn_env(overlay_home: &Path) -> HashMap<String, String> {
    let mut env = HashMap::new();
    for var in SAFE_VARS {
        if let Ok(value) = std::env::var(var) {
            env.insert((*var).to_string(), value);
        }
    }
    env.insert("HOME".to_string(), overlay_home.display().to_string());
    env
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
