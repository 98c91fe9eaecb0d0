// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Surface the central resource store inside a version's isolated home.
//!
//! `commands/`, `skills/`, and `hooks/` are symlinked wholesale into
//! `home/.{agent}/`; memory files are linked file-by-file so the shared
//! `AGENTS.md` can take the agent's own instructions-file name. Agents
//! whose command format is TOML get per-file conversions instead of a
//! commands symlink.

use crate::error::{io_err, VersionError};
use agx_adapters::markdown_to_toml;
use agx_core::{AgentKind, CommandFormat, SHARED_INSTRUCTIONS};
use agx_store::Store;
use std::path::Path;

/// Re-materialize the central resources into `(agent, version)`'s home.
///
/// Existing entries are replaced. Individual link failures are skipped so a
/// later run can recover; only setup of the home tree itself is fatal.
pub fn sync_resources_to_version(
    store: &Store,
    agent: AgentKind,
    version: &str,
) -> Result<(), VersionError> {
    let info = agent.info();
    let config_dir = store
        .version_dir(agent, version)
        .join("home")
        .join(info.config_dir);
    std::fs::create_dir_all(&config_dir).map_err(|e| io_err("create", &config_dir, e))?;

    // Commands: symlink for markdown agents, converted copies for TOML
    let commands_target = config_dir.join(info.commands_subdir);
    match info.command_format {
        CommandFormat::Markdown => {
            replace_with_symlink(&store.commands_dir(), &commands_target);
        }
        CommandFormat::Toml => {
            if let Err(e) = write_toml_commands(store, &commands_target) {
                tracing::debug!(error = %e, "skipping toml command conversion");
            }
        }
    }

    replace_with_symlink(&store.skills_dir(), &config_dir.join("skills"));
    replace_with_symlink(&store.hooks_dir(), &config_dir.join("hooks"));

    // Memory: file-by-file, renaming the shared default to the agent's own
    // instructions file.
    if let Ok(entries) = std::fs::read_dir(store.memory_dir()) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let file_name = name.to_string_lossy();
            let link_name = if file_name == SHARED_INSTRUCTIONS {
                info.instructions_file.to_string()
            } else {
                file_name.into_owned()
            };
            replace_with_symlink(&entry.path(), &config_dir.join(link_name));
        }
    }

    Ok(())
}

/// Remove whatever sits at `target`, then link it to `source`.
/// Failures are logged and skipped.
fn replace_with_symlink(source: &Path, target: &Path) {
    remove_entry(target);
    if !source.exists() {
        return;
    }
    if let Err(e) = symlink(source, target) {
        tracing::debug!(
            source = %source.display(),
            target = %target.display(),
            error = %e,
            "failed to link resource"
        );
    }
}

fn remove_entry(path: &Path) {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return;
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(e) = result {
        tracing::debug!(path = %path.display(), error = %e, "failed to remove stale entry");
    }
}

fn write_toml_commands(store: &Store, target: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(target)?;
    let entries = match std::fs::read_dir(store.commands_dir()) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let markdown = std::fs::read_to_string(&path)?;
        let toml = markdown_to_toml(name, &markdown);
        std::fs::write(target.join(format!("{name}.toml")), toml)?;
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

/// Platforms without symlink support fall back to copies; staleness is
/// handled by the unconditional replace on every resync.
#[cfg(not(unix))]
fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        copy_dir(source, target)
    } else {
        std::fs::copy(source, target).map(|_| ())
    }
}

#[cfg(not(unix))]
fn copy_dir(source: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(target)?;
    for entry in std::fs::read_dir(source)?.flatten() {
        let dest = target.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
