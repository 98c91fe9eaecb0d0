// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config-repo source strings.
//!
//! The parser is total: every input maps to exactly one [`RepoSource`]
//! variant or a [`RepoParseError`]. Accepted forms:
//!
//! - `gh:OWNER/REPO[@REF]`
//! - `git@github.com:OWNER/REPO[.git]`
//! - `github.com:OWNER/REPO[.git]` and `github.com/OWNER/REPO[.git]`
//! - `http(s)://...` (github hosts normalized, `.git` appended elsewhere)
//! - absolute or relative existing paths
//! - bare `OWNER/REPO` (no dots, no colons)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default branch used when a source carries no `@ref`.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoParseError {
    #[error("empty repo source")]
    Empty,
    #[error("unrecognized repo source '{0}'")]
    Unrecognized(String),
    #[error("invalid github repo '{0}': expected OWNER/REPO")]
    BadGitHubPath(String),
}

/// Where a config repo lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RepoSource {
    Github { owner: String, repo: String },
    Url { url: String },
    Local { path: PathBuf },
}

/// A parsed repo source plus the optional `@ref` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub source: RepoSource,
    pub reference: Option<String>,
}

impl RepoRef {
    /// Parse a source string. See the module docs for the accepted grammar.
    pub fn parse(input: &str) -> Result<Self, RepoParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RepoParseError::Empty);
        }

        let (body, reference) = split_ref(input);
        let source = parse_source(body)?;
        Ok(Self { source, reference })
    }

    /// Canonical clone URL (or local path) for the source.
    pub fn clone_url(&self) -> String {
        match &self.source {
            RepoSource::Github { owner, repo } => {
                format!("https://github.com/{owner}/{repo}.git")
            }
            RepoSource::Url { url } => url.clone(),
            RepoSource::Local { path } => path.display().to_string(),
        }
    }

    /// Branch or tag to check out; defaults to `main`.
    pub fn branch(&self) -> &str {
        self.reference.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn is_local(&self) -> bool {
        matches!(self.source, RepoSource::Local { .. })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reference {
            Some(r) => write!(f, "{}@{r}", self.clone_url()),
            None => f.write_str(&self.clone_url()),
        }
    }
}

/// Split a trailing `@ref`. The ref is only split off when it is the last
/// `@`, the prefix is not an SSH git URL, and the prefix contains no `://`.
fn split_ref(input: &str) -> (&str, Option<String>) {
    let Some(at) = input.rfind('@') else {
        return (input, None);
    };
    let (prefix, suffix) = (&input[..at], &input[at + 1..]);
    if prefix.is_empty() || suffix.is_empty() {
        return (input, None);
    }
    if prefix.contains("://") {
        return (input, None);
    }
    // An SSH URL's `@` separates user from host; the remainder carries the
    // repo path, which a ref never does.
    if suffix.contains(':') || suffix.contains('/') {
        return (input, None);
    }
    (prefix, Some(suffix.to_string()))
}

fn parse_source(body: &str) -> Result<RepoSource, RepoParseError> {
    if let Some(rest) = body.strip_prefix("gh:") {
        return github_from_path(rest);
    }
    if let Some(rest) = body.strip_prefix("git@github.com:") {
        return github_from_path(rest);
    }
    if let Some(rest) = body
        .strip_prefix("github.com:")
        .or_else(|| body.strip_prefix("github.com/"))
    {
        return github_from_path(rest);
    }
    if body.starts_with("http://") || body.starts_with("https://") {
        return parse_url(body);
    }
    if body.starts_with('/') || body.starts_with("./") || body.starts_with("../") || body == "." {
        return local_from_path(body);
    }
    if Path::new(body).exists() {
        return local_from_path(body);
    }
    // Bare OWNER/REPO: exactly one slash, no dots, no colons.
    if !body.contains('.') && !body.contains(':') && body.matches('/').count() == 1 {
        return github_from_path(body);
    }
    Err(RepoParseError::Unrecognized(body.to_string()))
}

fn parse_url(url: &str) -> Result<RepoSource, RepoParseError> {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    if let Some(path) = stripped.strip_prefix("github.com/") {
        return github_from_path(path);
    }
    let url = if url.ends_with(".git") {
        url.to_string()
    } else {
        format!("{url}.git")
    };
    Ok(RepoSource::Url { url })
}

fn github_from_path(path: &str) -> Result<RepoSource, RepoParseError> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.splitn(2, '/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(RepoParseError::BadGitHubPath(path.to_string()));
    }
    Ok(RepoSource::Github {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

fn local_from_path(path: &str) -> Result<RepoSource, RepoParseError> {
    let p = Path::new(path);
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(p))
            .unwrap_or_else(|_| p.to_path_buf())
    };
    // Normalize `.` and `..` components without touching symlinks.
    let mut out = PathBuf::new();
    for comp in abs.components() {
        match comp {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(RepoSource::Local { path: out })
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
