// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PATH shims.
//!
//! A shim is a small POSIX sh script at `shims/{cli}` that resolves the
//! active version for the current directory (project pin first, then the
//! global default), sets HOME to that version's private home, and execs
//! the real binary with the original arguments.

use crate::error::{io_err, VersionError};
use agx_core::AgentKind;
use agx_store::Store;
use std::path::PathBuf;

/// Shells we can emit PATH setup instructions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Detect the interactive shell from `$SHELL`; bash is the fallback.
    pub fn detect() -> Self {
        let shell = std::env::var("SHELL").unwrap_or_default();
        if shell.ends_with("zsh") {
            Shell::Zsh
        } else if shell.ends_with("fish") {
            Shell::Fish
        } else {
            Shell::Bash
        }
    }
}

/// The shim resolves versions without calling back into agx, so that an
/// agent invocation stays a single exec chain. The same resolution rule as
/// [`crate::VersionManager::resolve_version`]: walk up for a project pin in
/// `.agents/agents.yaml`, then fall back to the meta document.
fn shim_script(store: &Store, agent: AgentKind) -> String {
    let id = agent.to_string();
    let cli = agent.info().cli_name;
    let home = store.home().display().to_string();
    format!(
        r#"#!/bin/sh
# Generated by agx; do not edit. Re-create with `agx add {id}`.
AGX_HOME="${{AGX_HOME:-{home}}}"

lookup() {{
  awk -v agent="{id}:" '
    /^agents:/ {{ in_agents = 1; next }}
    in_agents && /^[^ ]/ {{ exit }}
    in_agents && $1 == agent {{ print $2; exit }}
  ' "$1" 2>/dev/null
}}

version=""
dir="$PWD"
while [ -n "$dir" ]; do
  if [ -f "$dir/.agents/agents.yaml" ]; then
    version="$(lookup "$dir/.agents/agents.yaml")"
    [ -n "$version" ] && break
  fi
  [ "$dir" = "/" ] && break
  dir="$(dirname "$dir")"
done

if [ -z "$version" ]; then
  version="$(lookup "$AGX_HOME/meta.yaml")"
fi

if [ -z "$version" ]; then
  echo "agx: no version selected for {id}; run 'agx add {id}'" >&2
  exit 1
fi

bin="$AGX_HOME/versions/{id}/$version/node_modules/.bin/{cli}"
if [ ! -x "$bin" ]; then
  echo "agx: {id}@$version is not installed" >&2
  exit 1
fi

HOME="$AGX_HOME/versions/{id}/$version/home" exec "$bin" "$@"
"#
    )
}

/// Path of an agent's shim.
pub fn shim_path(store: &Store, agent: AgentKind) -> PathBuf {
    store.shims_dir().join(agent.info().cli_name)
}

/// Create (or refresh) the shim for an agent.
pub fn create_shim(store: &Store, agent: AgentKind) -> Result<PathBuf, VersionError> {
    let dir = store.shims_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
    let path = shim_path(store, agent);
    std::fs::write(&path, shim_script(store, agent)).map_err(|e| io_err("write", &path, e))?;
    set_executable(&path)?;
    Ok(path)
}

/// Delete the shim if present.
pub fn remove_shim(store: &Store, agent: AgentKind) -> Result<(), VersionError> {
    let path = shim_path(store, agent);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err("remove", &path, e)),
    }
}

/// True when the shims directory is on the current PATH.
pub fn shims_in_path(store: &Store) -> bool {
    let shims = store.shims_dir();
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|p| p == shims))
        .unwrap_or(false)
}

/// One-time PATH setup instructions for the user's shell.
pub fn path_instructions(store: &Store, shell: Shell) -> String {
    let shims = store.shims_dir().display().to_string();
    match shell {
        Shell::Bash => format!(
            "Add the shims directory to your PATH:\n\n  echo 'export PATH=\"{shims}:$PATH\"' >> ~/.bashrc\n  source ~/.bashrc"
        ),
        Shell::Zsh => format!(
            "Add the shims directory to your PATH:\n\n  echo 'export PATH=\"{shims}:$PATH\"' >> ~/.zshrc\n  source ~/.zshrc"
        ),
        Shell::Fish => format!(
            "Add the shims directory to your PATH:\n\n  fish_add_path --prepend {shims}"
        ),
    }
}

#[cfg(unix)]
fn set_executable(path: &std::path::Path) -> Result<(), VersionError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o755);
    std::fs::set_permissions(path, perms).map_err(|e| io_err("chmod", path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &std::path::Path) -> Result<(), VersionError> {
    Ok(())
}

#[cfg(test)]
#[path = "shim_tests.rs"]
mod tests;
