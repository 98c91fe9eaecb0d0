// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repo layout discovery.
//!
//! A config repo has a fixed layout:
//!
//! ```text
//! agents.yaml
//! shared/commands/*.md
//! {agent}/{commands_subdir}/*.md     agent-specific command overrides
//! skills/{name}/SKILL.md [+ rules/]
//! hooks/*                             optionally {agent}/hooks/*
//! memory/*.md
//! jobs/*.yml
//! drives/{name}.md | drives/{name}/
//! ```

use crate::error::{io_err, SyncError};
use agx_adapters::split_front_matter;
use agx_core::{AgentKind, Manifest};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A discovered command file. `agent: None` means `shared/commands/`.
#[derive(Debug, Clone)]
pub struct DiscoveredCommand {
    pub name: String,
    pub description: Option<String>,
    pub path: PathBuf,
    pub agent: Option<AgentKind>,
    /// Validation failure, if any; invalid commands are listed but not
    /// installed.
    pub invalid: Option<String>,
}

/// Skill metadata out of `SKILL.md` front matter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillMeta {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DiscoveredSkill {
    pub name: String,
    pub path: PathBuf,
    pub meta: SkillMeta,
    /// Number of files under `rules/`.
    pub rule_count: usize,
}

#[derive(Debug, Clone)]
pub struct DiscoveredHook {
    pub name: String,
    pub path: PathBuf,
    pub agent: Option<AgentKind>,
}

#[derive(Debug, Clone)]
pub struct DiscoveredMemory {
    /// Agent the file belongs to, mapped back from its instructions-file
    /// name; `None` for the shared default.
    pub agent: Option<AgentKind>,
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct DiscoveredJob {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DiscoveredDrive {
    pub name: String,
    pub path: PathBuf,
}

/// Everything a repo declares, in stable discovery order.
#[derive(Debug, Default)]
pub struct Discovery {
    pub commands: Vec<DiscoveredCommand>,
    pub skills: Vec<DiscoveredSkill>,
    pub hooks: Vec<DiscoveredHook>,
    pub memory: Vec<DiscoveredMemory>,
    pub jobs: Vec<DiscoveredJob>,
    pub drives: Vec<DiscoveredDrive>,
    pub manifest: Option<Manifest>,
}

impl Discovery {
    /// Commands for presentation: shared first, agent-specific overrides of
    /// the same name not repeated.
    pub fn commands_for_display(&self) -> Vec<&DiscoveredCommand> {
        let mut seen = std::collections::BTreeSet::new();
        let mut out = Vec::new();
        for cmd in self.commands.iter().filter(|c| c.agent.is_none()) {
            seen.insert(cmd.name.clone());
            out.push(cmd);
        }
        for cmd in self.commands.iter().filter(|c| c.agent.is_some()) {
            if seen.insert(cmd.name.clone()) {
                out.push(cmd);
            }
        }
        out
    }

    /// Resolve the source for installing command `name` to `agent`: an
    /// agent-specific file wins over the shared one.
    pub fn command_source(&self, name: &str, agent: AgentKind) -> Option<&DiscoveredCommand> {
        self.commands
            .iter()
            .find(|c| c.name == name && c.agent == Some(agent))
            .or_else(|| {
                self.commands
                    .iter()
                    .find(|c| c.name == name && c.agent.is_none())
            })
    }
}

/// Scan a repo checkout.
pub fn discover(repo_root: &Path) -> Result<Discovery, SyncError> {
    let mut discovery = Discovery {
        manifest: Manifest::load_from_repo(repo_root)?,
        ..Discovery::default()
    };

    // Shared commands first (stable order)
    let shared = repo_root.join("shared/commands");
    for path in sorted_files(&shared, Some("md"))? {
        discovery.commands.push(read_command(&path, None));
    }

    // Agent-specific overrides
    for agent in AgentKind::ALL {
        let dir = repo_root
            .join(agent.to_string())
            .join(agent.info().commands_subdir);
        for path in sorted_files(&dir, Some("md"))? {
            discovery.commands.push(read_command(&path, Some(agent)));
        }
    }

    // Skills: one directory per skill with a SKILL.md
    let skills_dir = repo_root.join("skills");
    for dir in sorted_dirs(&skills_dir)? {
        let Some(name) = file_name(&dir) else { continue };
        let manifest = dir.join("SKILL.md");
        let meta = std::fs::read_to_string(&manifest)
            .ok()
            .and_then(|content| {
                let (front, _) = split_front_matter(&content);
                front.and_then(|f| serde_yaml::from_str(f).ok())
            })
            .unwrap_or_default();
        let rule_count = count_files(&dir.join("rules"));
        discovery.skills.push(DiscoveredSkill {
            name,
            path: dir,
            meta,
            rule_count,
        });
    }

    // Hooks: shared flat dir plus per-agent subdirs
    let hooks_dir = repo_root.join("hooks");
    for path in sorted_files(&hooks_dir, None)? {
        let Some(name) = file_name(&path) else { continue };
        discovery.hooks.push(DiscoveredHook {
            name,
            path,
            agent: None,
        });
    }
    for agent in AgentKind::ALL {
        let dir = repo_root.join(agent.to_string()).join("hooks");
        for path in sorted_files(&dir, None)? {
            let Some(name) = file_name(&path) else { continue };
            discovery.hooks.push(DiscoveredHook {
                name,
                path,
                agent: Some(agent),
            });
        }
    }

    // Memory files
    let memory_dir = repo_root.join("memory");
    for path in sorted_files(&memory_dir, Some("md"))? {
        let Some(file_name) = file_name(&path) else { continue };
        let agent = AgentKind::ALL
            .into_iter()
            .find(|a| a.info().instructions_file == file_name && file_name != agx_core::SHARED_INSTRUCTIONS);
        discovery.memory.push(DiscoveredMemory {
            agent,
            path,
            file_name,
        });
    }

    // Jobs
    let jobs_dir = repo_root.join("jobs");
    for path in sorted_files(&jobs_dir, None)? {
        let ext = path.extension().and_then(|e| e.to_str());
        if ext != Some("yml") && ext != Some("yaml") {
            continue;
        }
        let Some(name) = stem(&path) else { continue };
        discovery.jobs.push(DiscoveredJob { name, path });
    }

    // Drives: single files or directories
    let drives_dir = repo_root.join("drives");
    for path in sorted_files(&drives_dir, Some("md"))? {
        let Some(name) = stem(&path) else { continue };
        discovery.drives.push(DiscoveredDrive { name, path });
    }
    for dir in sorted_dirs(&drives_dir)? {
        let Some(name) = file_name(&dir) else { continue };
        discovery.drives.push(DiscoveredDrive { name, path: dir });
    }

    Ok(discovery)
}

fn read_command(path: &Path, agent: Option<AgentKind>) -> DiscoveredCommand {
    let name = stem(path).unwrap_or_default();
    let (description, invalid) = match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            (None, Some("command file is empty".to_string()))
        }
        Ok(content) => {
            let description = split_front_matter(&content).0.and_then(|front| {
                front.lines().find_map(|line| {
                    line.strip_prefix("description:")
                        .map(|d| d.trim().trim_matches('"').to_string())
                })
            });
            (description, None)
        }
        Err(e) => (None, Some(e.to_string())),
    };
    DiscoveredCommand {
        name,
        description,
        path: path.to_path_buf(),
        agent,
        invalid,
    }
}

fn sorted_files(dir: &Path, ext: Option<&str>) -> Result<Vec<PathBuf>, SyncError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err("read", dir, e)),
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| match ext {
            Some(ext) => p.extension().and_then(|e| e.to_str()) == Some(ext),
            None => true,
        })
        .collect();
    files.sort();
    Ok(files)
}

fn sorted_dirs(dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err("read", dir, e)),
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn count_files(dir: &Path) -> usize {
    sorted_files(dir, None).map(|files| files.len()).unwrap_or(0)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_string)
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem()?.to_str().map(str::to_string)
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
