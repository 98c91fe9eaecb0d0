// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Appliers: copy discovered resources into the central store.
//!
//! Central storage is format-neutral: commands stay markdown regardless of
//! the consumer agent, skills keep their directory layout, hooks flatten
//! into `hooks/`, memory files keep their names (agent-facing renames
//! happen at link time).

use crate::discover::{
    DiscoveredCommand, DiscoveredDrive, DiscoveredHook, DiscoveredJob, DiscoveredMemory,
    DiscoveredSkill,
};
use crate::error::{io_err, SyncError};
use agx_drive::DriveStore;
use agx_jobs::JobSpec;
use agx_store::Store;
use std::path::{Path, PathBuf};

/// Central path a command installs to.
pub fn command_target(store: &Store, name: &str) -> PathBuf {
    store.commands_dir().join(format!("{name}.md"))
}

pub fn install_command(store: &Store, cmd: &DiscoveredCommand) -> Result<(), SyncError> {
    if let Some(reason) = &cmd.invalid {
        return Err(SyncError::Io {
            action: "install",
            path: cmd.path.clone(),
            source: std::io::Error::other(reason.clone()),
        });
    }
    copy_file(&cmd.path, &command_target(store, &cmd.name))
}

/// Skills keep their whole directory, including `rules/`.
pub fn install_skill(store: &Store, skill: &DiscoveredSkill) -> Result<(), SyncError> {
    let target = store.skills_dir().join(&skill.name);
    if target.exists() {
        std::fs::remove_dir_all(&target).map_err(|e| io_err("remove", &target, e))?;
    }
    copy_dir(&skill.path, &target)
}

/// Hooks install flat; the shared-vs-agent split exists only in the repo.
pub fn install_hook(store: &Store, hook: &DiscoveredHook) -> Result<(), SyncError> {
    copy_file(&hook.path, &store.hooks_dir().join(&hook.name))
}

pub fn install_memory(store: &Store, memory: &DiscoveredMemory) -> Result<(), SyncError> {
    copy_file(&memory.path, &store.memory_dir().join(&memory.file_name))
}

/// Jobs are validated before the copy; an invalid job is rejected.
pub fn install_job(store: &Store, job: &DiscoveredJob) -> Result<JobSpec, SyncError> {
    let content =
        std::fs::read_to_string(&job.path).map_err(|e| io_err("read", &job.path, e))?;
    let spec: JobSpec = serde_yaml::from_str(&content).map_err(|e| SyncError::Io {
        action: "parse",
        path: job.path.clone(),
        source: std::io::Error::other(e),
    })?;
    let errors = spec.validate();
    if !errors.is_empty() {
        let summary = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(SyncError::Io {
            action: "validate",
            path: job.path.clone(),
            source: std::io::Error::other(summary),
        });
    }
    let target = store.jobs_dir().join(format!("{}.yml", job.name));
    copy_file(&job.path, &target)?;
    Ok(spec)
}

pub fn install_drive(drives: &DriveStore, drive: &DiscoveredDrive) -> Result<(), SyncError> {
    drives
        .install_from_path(&drive.name, &drive.path)
        .map_err(|e| SyncError::Io {
            action: "install",
            path: drive.path.clone(),
            source: std::io::Error::other(e),
        })
}

fn copy_file(source: &Path, target: &Path) -> Result<(), SyncError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
    }
    std::fs::copy(source, target).map_err(|e| io_err("copy", source, e))?;
    Ok(())
}

fn copy_dir(source: &Path, target: &Path) -> Result<(), SyncError> {
    std::fs::create_dir_all(target).map_err(|e| io_err("create", target, e))?;
    let entries = std::fs::read_dir(source).map_err(|e| io_err("read", source, e))?;
    for entry in entries.flatten() {
        let dest = target.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), &dest)
                .map_err(|e| io_err("copy", &entry.path(), e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
