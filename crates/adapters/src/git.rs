// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git transport. The sync engine only needs clone-or-pull plus a small
//! set of porcelain operations; everything shells out to the `git` binary.

use crate::process::{ProcessRequest, ProcessRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git is not installed or not on PATH")]
    Missing,
    #[error("git {op} failed: {summary}")]
    Command { op: &'static str, summary: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a clone-or-pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSync {
    /// Short commit hash after the operation.
    pub commit: String,
    /// True when the target was freshly cloned.
    pub is_new: bool,
}

#[async_trait]
pub trait GitAdapter: Send + Sync {
    /// Clone `source` at `reference` into `target`, or pull if the clone
    /// already exists.
    async fn clone_or_pull(
        &self,
        source: &str,
        reference: &str,
        target: &Path,
    ) -> Result<GitSync, GitError>;

    /// `git status --porcelain`, non-empty when the tree is dirty.
    async fn status_porcelain(&self, repo: &Path) -> Result<String, GitError>;

    async fn add_all(&self, repo: &Path) -> Result<(), GitError>;

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    async fn push(&self, repo: &Path) -> Result<(), GitError>;

    async fn get_remote(&self, repo: &Path) -> Result<Option<String>, GitError>;

    async fn set_remote(&self, repo: &Path, url: &str) -> Result<(), GitError>;
}

/// Real adapter shelling out to `git`.
#[derive(Clone)]
pub struct GitCli {
    runner: Arc<dyn ProcessRunner>,
}

impl GitCli {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn git(
        &self,
        op: &'static str,
        cwd: Option<&Path>,
        args: &[&str],
    ) -> Result<String, GitError> {
        let mut request = ProcessRequest::new("git", args);
        if let Some(cwd) = cwd {
            request = request.cwd(cwd.to_path_buf());
        }
        let output = self.runner.run(request).await?;
        if !output.success() {
            return Err(GitError::Command {
                op,
                summary: output.failure_summary(),
            });
        }
        Ok(output.stdout)
    }

    async fn short_head(&self, repo: &Path) -> Result<String, GitError> {
        let out = self
            .git("rev-parse", Some(repo), &["rev-parse", "--short", "HEAD"])
            .await?;
        Ok(out.trim().to_string())
    }
}

#[async_trait]
impl GitAdapter for GitCli {
    async fn clone_or_pull(
        &self,
        source: &str,
        reference: &str,
        target: &Path,
    ) -> Result<GitSync, GitError> {
        if target.join(".git").is_dir() {
            self.git("fetch", Some(target), &["fetch", "origin", reference])
                .await?;
            self.git(
                "checkout",
                Some(target),
                &["checkout", "--quiet", reference],
            )
            .await?;
            self.git(
                "pull",
                Some(target),
                &["pull", "--ff-only", "origin", reference],
            )
            .await?;
            let commit = self.short_head(target).await?;
            return Ok(GitSync {
                commit,
                is_new: false,
            });
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let target_str = target.display().to_string();
        self.git(
            "clone",
            None,
            &[
                "clone",
                "--branch",
                reference,
                "--single-branch",
                source,
                &target_str,
            ],
        )
        .await?;
        let commit = self.short_head(target).await?;
        Ok(GitSync {
            commit,
            is_new: true,
        })
    }

    async fn status_porcelain(&self, repo: &Path) -> Result<String, GitError> {
        self.git("status", Some(repo), &["status", "--porcelain"])
            .await
    }

    async fn add_all(&self, repo: &Path) -> Result<(), GitError> {
        self.git("add", Some(repo), &["add", "--all"]).await?;
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.git("commit", Some(repo), &["commit", "-m", message])
            .await?;
        Ok(())
    }

    async fn push(&self, repo: &Path) -> Result<(), GitError> {
        self.git("push", Some(repo), &["push"]).await?;
        Ok(())
    }

    async fn get_remote(&self, repo: &Path) -> Result<Option<String>, GitError> {
        match self
            .git(
                "remote",
                Some(repo),
                &["remote", "get-url", "origin"],
            )
            .await
        {
            Ok(out) => Ok(Some(out.trim().to_string()).filter(|s| !s.is_empty())),
            Err(GitError::Command { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_remote(&self, repo: &Path, url: &str) -> Result<(), GitError> {
        if self.get_remote(repo).await?.is_some() {
            self.git(
                "remote",
                Some(repo),
                &["remote", "set-url", "origin", url],
            )
            .await?;
        } else {
            self.git("remote", Some(repo), &["remote", "add", "origin", url])
                .await?;
        }
        Ok(())
    }
}

/// In-memory git for tests: `clone_or_pull` materializes a directory from
/// scripted fixture files.
#[cfg(any(test, feature = "test-support"))]
type Fixtures =
    std::collections::HashMap<String, (String, Vec<(std::path::PathBuf, String)>)>;

#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeGit {
    /// source → (commit, files relative to repo root)
    fixtures: Arc<parking_lot::Mutex<Fixtures>>,
    pulls: Arc<parking_lot::Mutex<Vec<String>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(self, source: &str, commit: &str, files: &[(&str, &str)]) -> Self {
        self.fixtures.lock().insert(
            source.to_string(),
            (
                commit.to_string(),
                files
                    .iter()
                    .map(|(p, c)| (std::path::PathBuf::from(p), c.to_string()))
                    .collect(),
            ),
        );
        self
    }

    pub fn pulled_sources(&self) -> Vec<String> {
        self.pulls.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl GitAdapter for FakeGit {
    async fn clone_or_pull(
        &self,
        source: &str,
        _reference: &str,
        target: &Path,
    ) -> Result<GitSync, GitError> {
        let fixtures = self.fixtures.lock();
        let Some((commit, files)) = fixtures.get(source) else {
            return Err(GitError::Command {
                op: "clone",
                summary: format!("repository not found: {source}"),
            });
        };
        let is_new = !target.exists();
        std::fs::create_dir_all(target)?;
        for (rel, content) in files {
            let path = target.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        self.pulls.lock().push(source.to_string());
        Ok(GitSync {
            commit: commit.clone(),
            is_new,
        })
    }

    async fn status_porcelain(&self, _repo: &Path) -> Result<String, GitError> {
        Ok(String::new())
    }

    async fn add_all(&self, _repo: &Path) -> Result<(), GitError> {
        Ok(())
    }

    async fn commit(&self, _repo: &Path, _message: &str) -> Result<(), GitError> {
        Ok(())
    }

    async fn push(&self, _repo: &Path) -> Result<(), GitError> {
        Ok(())
    }

    async fn get_remote(&self, _repo: &Path) -> Result<Option<String>, GitError> {
        Ok(None)
    }

    async fn set_remote(&self, _repo: &Path, _url: &str) -> Result<(), GitError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
