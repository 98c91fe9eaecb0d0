// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install, remove, list, and resolve agent versions.
//!
//! A version is installed iff its binary exists at the deterministic path
//! `versions/{agent}/{version}/node_modules/.bin/{cli}`; nothing about
//! installs is recorded in the meta document except the global default.

use crate::compare::compare_versions;
use crate::error::{io_err, VersionError};
use crate::spec::LATEST;
use agx_adapters::{ProcessRequest, ProcessRunner};
use agx_core::find_project_manifest;
use agx_core::AgentKind;
use agx_store::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Concrete version that ended up installed (resolved from `latest`).
    pub version: String,
    /// True when this install became the global default.
    pub became_default: bool,
}

pub struct VersionManager {
    store: Store,
    runner: Arc<dyn ProcessRunner>,
}

impl VersionManager {
    pub fn new(store: Store, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { store, runner }
    }

    /// Deterministic binary path for an (agent, version) pair.
    pub fn binary_path(&self, agent: AgentKind, version: &str) -> PathBuf {
        self.store
            .version_dir(agent, version)
            .join("node_modules/.bin")
            .join(agent.info().cli_name)
    }

    /// Private HOME for an (agent, version) pair.
    pub fn home_dir(&self, agent: AgentKind, version: &str) -> PathBuf {
        self.store.version_dir(agent, version).join("home")
    }

    pub fn is_installed(&self, agent: AgentKind, version: &str) -> bool {
        self.binary_path(agent, version).exists()
    }

    /// Install a version via the upstream npm package.
    ///
    /// `latest` installs into a scratch directory, then the real version is
    /// read from the package metadata and the directory renamed. Failures
    /// leave no partial directory behind.
    pub async fn install_version(
        &self,
        agent: AgentKind,
        version: &str,
    ) -> Result<InstallOutcome, VersionError> {
        let package = agent
            .info()
            .package
            .ok_or(VersionError::NotInstallable(agent))?;

        let target = self.store.version_dir(agent, version);
        std::fs::create_dir_all(&target).map_err(|e| io_err("create", &target, e))?;

        let spec = if version == LATEST {
            package.to_string()
        } else {
            format!("{package}@{version}")
        };
        let prefix = target.display().to_string();
        let request = ProcessRequest::new(
            "npm",
            &["install", "--prefix", &prefix, "--no-fund", "--no-audit", &spec],
        );

        let output = match self.runner.run(request).await {
            Ok(o) => o,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&target);
                return Err(VersionError::InstallFailed {
                    agent,
                    version: version.to_string(),
                    summary: e.to_string(),
                });
            }
        };
        if !output.success() {
            let _ = std::fs::remove_dir_all(&target);
            return Err(VersionError::InstallFailed {
                agent,
                version: version.to_string(),
                summary: output.failure_summary(),
            });
        }

        let resolved = if version == LATEST {
            match self.finalize_latest(agent, package, &target) {
                Ok(v) => v,
                Err(e) => {
                    let _ = std::fs::remove_dir_all(&target);
                    return Err(e);
                }
            }
        } else {
            version.to_string()
        };

        let home = self.home_dir(agent, &resolved);
        std::fs::create_dir_all(&home).map_err(|e| io_err("create", &home, e))?;

        let mut meta = self.store.read_meta();
        let became_default = !meta.agents.contains_key(&agent);
        if became_default {
            meta.agents.insert(agent, resolved.clone());
            self.store.write_meta(&meta)?;
        }

        tracing::info!(agent = %agent, version = %resolved, "installed agent version");
        Ok(InstallOutcome {
            version: resolved,
            became_default,
        })
    }

    /// Read the concrete version out of a `latest` install and rename the
    /// scratch directory. An already-present destination wins; the scratch
    /// install is destroyed.
    fn finalize_latest(
        &self,
        agent: AgentKind,
        package: &str,
        scratch: &Path,
    ) -> Result<String, VersionError> {
        let meta_path = scratch.join("node_modules").join(package).join("package.json");
        let content = std::fs::read_to_string(&meta_path)
            .map_err(|_| VersionError::MissingPackageMeta(meta_path.clone()))?;
        let doc: serde_json::Value = serde_json::from_str(&content)
            .map_err(|_| VersionError::MissingPackageMeta(meta_path.clone()))?;
        let resolved = doc
            .get("version")
            .and_then(|v| v.as_str())
            .ok_or(VersionError::MissingPackageMeta(meta_path))?
            .to_string();

        let dest = self.store.version_dir(agent, &resolved);
        if dest.exists() {
            std::fs::remove_dir_all(scratch).map_err(|e| io_err("remove", scratch, e))?;
        } else {
            std::fs::rename(scratch, &dest).map_err(|e| io_err("rename", scratch, e))?;
        }
        Ok(resolved)
    }

    /// Remove one installed version, reselecting the global default when the
    /// removed version held it.
    pub async fn remove_version(
        &self,
        agent: AgentKind,
        version: &str,
    ) -> Result<(), VersionError> {
        let dir = self.store.version_dir(agent, version);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| io_err("remove", &dir, e))?;
        }

        let mut meta = self.store.read_meta();
        if meta.agents.get(&agent).map(String::as_str) == Some(version) {
            match self.list_installed(agent).pop() {
                Some(next) => {
                    meta.agents.insert(agent, next);
                }
                None => {
                    meta.agents.remove(&agent);
                }
            }
            self.store.write_meta(&meta)?;
        }
        Ok(())
    }

    /// Remove every installed version of an agent and clear its default.
    pub async fn remove_all_versions(&self, agent: AgentKind) -> Result<(), VersionError> {
        let dir = self.store.versions_dir().join(agent.to_string());
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| io_err("remove", &dir, e))?;
        }
        let mut meta = self.store.read_meta();
        if meta.agents.remove(&agent).is_some() {
            self.store.write_meta(&meta)?;
        }
        Ok(())
    }

    /// Installed versions, ascending by the numeric comparator. Directories
    /// without the expected binary are not installed.
    pub fn list_installed(&self, agent: AgentKind) -> Vec<String> {
        let dir = self.store.versions_dir().join(agent.to_string());
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut versions: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|v| self.is_installed(agent, v))
            .collect();
        versions.sort_by(|a, b| compare_versions(a, b));
        versions
    }

    /// Global default version for an agent, if set.
    pub fn default_version(&self, agent: AgentKind) -> Option<String> {
        self.store.read_meta().agents.get(&agent).cloned()
    }

    /// Set the global default. The version must be installed.
    pub fn use_version(&self, agent: AgentKind, version: &str) -> Result<(), VersionError> {
        if !self.is_installed(agent, version) {
            return Err(VersionError::NotInstalled {
                agent,
                version: version.to_string(),
            });
        }
        let mut meta = self.store.read_meta();
        meta.agents.insert(agent, version.to_string());
        self.store.write_meta(&meta)?;
        Ok(())
    }

    /// Resolve the version to run from `cwd`: a project pin in
    /// `.agents/agents.yaml` wins over the global default.
    pub fn resolve_version(&self, agent: AgentKind, cwd: &Path) -> Option<String> {
        if let Ok(Some((_, manifest))) = find_project_manifest(cwd) {
            if let Some(version) = manifest.agents.get(&agent) {
                return Some(version.clone());
            }
        }
        self.default_version(agent)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
