// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agents home layout and meta document I/O.

use crate::migrate;
use agx_core::{AgentKind, Meta, RepoRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Meta document file name under the agents home.
pub const META_FILE: &str = "meta.yaml";

/// Legacy JSON state file superseded by the meta document.
pub(crate) const LEGACY_STATE_FILE: &str = "state.json";

/// Legacy resource directory superseded by `memory/`.
const LEGACY_INSTRUCTIONS_DIR: &str = "instructions";

/// Top-level directories created by [`Store::ensure_layout`].
pub const LAYOUT_DIRS: [&str; 11] = [
    "repos", "packages", "versions", "shims", "commands", "skills", "hooks", "memory", "jobs",
    "runs", "drives",
];

const META_HEADER: &str = "# agx metadata. Managed by the agx CLI; edit with care.\n";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine home directory")]
    NoHome,
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize meta: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("repo slot '{0}' is readonly")]
    ReadonlySlot(String),
}

fn io_err(action: &'static str, path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Handle to the agents home directory.
#[derive(Debug, Clone)]
pub struct Store {
    home: PathBuf,
}

impl Store {
    /// Open the default store: `$AGX_HOME` when set, else `~/.agents`.
    pub fn open() -> Result<Self, StoreError> {
        if let Ok(custom) = std::env::var("AGX_HOME") {
            if !custom.is_empty() {
                return Ok(Self::at(PathBuf::from(custom)));
            }
        }
        let home = dirs::home_dir().ok_or(StoreError::NoHome)?;
        Ok(Self::at(home.join(".agents")))
    }

    /// Open a store rooted at an explicit path.
    pub fn at(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn meta_path(&self) -> PathBuf {
        self.home.join(META_FILE)
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.home.join("repos")
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.home.join("packages")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.home.join("versions")
    }

    pub fn shims_dir(&self) -> PathBuf {
        self.home.join("shims")
    }

    pub fn commands_dir(&self) -> PathBuf {
        self.home.join("commands")
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.home.join("skills")
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.home.join("hooks")
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.home.join("memory")
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.home.join("jobs")
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.home.join("runs")
    }

    pub fn drives_dir(&self) -> PathBuf {
        self.home.join("drives")
    }

    /// Directory holding one installed (agent, version) pair.
    pub fn version_dir(&self, agent: AgentKind, version: &str) -> PathBuf {
        self.versions_dir().join(agent.to_string()).join(version)
    }

    /// Directory for one run of a job.
    pub fn run_dir(&self, job: &str, run_id: &str) -> PathBuf {
        self.runs_dir().join(job).join(run_id)
    }

    /// Idempotently create the home directory tree.
    ///
    /// Also performs the one-shot `instructions/` → `memory/` migration:
    /// files missing from `memory/` are moved over, then the legacy
    /// directory is removed. `memory/` wins on name collisions.
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        for dir in LAYOUT_DIRS {
            let path = self.home.join(dir);
            std::fs::create_dir_all(&path).map_err(|e| io_err("create", &path, e))?;
        }
        self.migrate_instructions_dir()?;
        Ok(())
    }

    fn migrate_instructions_dir(&self) -> Result<(), StoreError> {
        let legacy = self.home.join(LEGACY_INSTRUCTIONS_DIR);
        if !legacy.is_dir() {
            return Ok(());
        }
        let memory = self.memory_dir();
        let entries = std::fs::read_dir(&legacy).map_err(|e| io_err("read", &legacy, e))?;
        for entry in entries.flatten() {
            let target = memory.join(entry.file_name());
            if target.exists() {
                continue;
            }
            if let Err(e) = std::fs::rename(entry.path(), &target) {
                tracing::warn!(
                    from = %entry.path().display(),
                    error = %e,
                    "failed to migrate legacy instructions file"
                );
            }
        }
        std::fs::remove_dir_all(&legacy).map_err(|e| io_err("remove", &legacy, e))?;
        tracing::info!(path = %legacy.display(), "migrated legacy instructions directory");
        Ok(())
    }

    /// Read the meta document. Never fails: absent, unreadable, or
    /// unmigratable files all yield the default empty document. Legacy
    /// formats are migrated, persisted, and the old file consumed.
    pub fn read_meta(&self) -> Meta {
        let path = self.meta_path();
        if let Ok(content) = std::fs::read_to_string(&path) {
            match migrate::parse_meta_yaml(&content) {
                Ok((meta, migrated)) => {
                    if migrated {
                        if let Err(e) = self.write_meta(&meta) {
                            tracing::warn!(error = %e, "failed to persist migrated meta");
                        }
                    }
                    return meta;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable meta; using defaults");
                    return Meta::default();
                }
            }
        }

        // Older installs kept a JSON state file instead.
        let legacy_path = self.home.join(LEGACY_STATE_FILE);
        if let Ok(content) = std::fs::read_to_string(&legacy_path) {
            if let Some(meta) = migrate::from_legacy_state_json(&content) {
                if self.write_meta(&meta).is_ok() {
                    let _ = std::fs::remove_file(&legacy_path);
                }
                return meta;
            }
            tracing::warn!(path = %legacy_path.display(), "unreadable legacy state; using defaults");
        }

        Meta::default()
    }

    /// Atomically write the meta document (temp file + rename).
    pub fn write_meta(&self, meta: &Meta) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.home).map_err(|e| io_err("create", &self.home, e))?;
        let body = serde_yaml::to_string(meta)?;
        let path = self.meta_path();
        let tmp = self.home.join(format!(".{META_FILE}.tmp"));
        std::fs::write(&tmp, format!("{META_HEADER}{body}"))
            .map_err(|e| io_err("write", &tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_err("rename", &tmp, e))?;
        Ok(())
    }

    pub fn get_repo(&self, slot: &str) -> Option<RepoRecord> {
        self.read_meta().repos.get(slot).cloned()
    }

    /// Create or update a repo slot. Readonly slots reject writes.
    pub fn set_repo(&self, slot: &str, record: RepoRecord) -> Result<(), StoreError> {
        let meta = self.read_meta();
        if meta.repos.get(slot).is_some_and(|r| r.readonly) {
            return Err(StoreError::ReadonlySlot(slot.to_string()));
        }
        self.set_repo_unchecked(slot, record)
    }

    /// Slot write that bypasses the readonly check. Reserved for the
    /// bootstrap and migration paths.
    pub fn set_repo_unchecked(&self, slot: &str, record: RepoRecord) -> Result<(), StoreError> {
        let mut meta = self.read_meta();
        meta.repos.insert(slot.to_string(), record);
        self.write_meta(&meta)
    }

    pub fn remove_repo(&self, slot: &str) -> Result<Option<RepoRecord>, StoreError> {
        let mut meta = self.read_meta();
        let removed = meta.repos.remove(slot);
        if removed.is_some() {
            self.write_meta(&meta)?;
        }
        Ok(removed)
    }

    /// Repo slots in ascending priority order.
    pub fn repos_by_priority(&self) -> Vec<(String, RepoRecord)> {
        self.read_meta()
            .repos_by_priority()
            .into_iter()
            .map(|(n, r)| (n.to_string(), r.clone()))
            .collect()
    }

    /// The active repo for commands that name none.
    pub fn highest_priority_repo(&self) -> Option<(String, RepoRecord)> {
        self.read_meta()
            .highest_priority_repo()
            .map(|(n, r)| (n.to_string(), r.clone()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
