// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single persisted metadata document.

use crate::agent::AgentKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reserved repo slot names with fixed priorities.
pub const SYSTEM_SLOT: &str = "system";
pub const USER_SLOT: &str = "user";
pub const PROJECT_SLOT: &str = "project";

const SYSTEM_PRIORITY: u32 = 0;
const USER_PRIORITY: u32 = 10;
const PROJECT_PRIORITY: u32 = 100;
const EXTRA_PRIORITY_BASE: u32 = 20;

/// Persisted state of one repo slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// Source string as the user supplied it.
    pub source: String,
    pub branch: String,
    /// Last known short commit.
    #[serde(default)]
    pub commit: String,
    /// ISO-8601 timestamp of the last sync.
    #[serde(default)]
    pub last_sync: String,
    pub priority: u32,
    #[serde(default)]
    pub readonly: bool,
}

/// Registry categories agx can search.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Mcp,
    Skill,
}

crate::simple_display! {
    RegistryKind {
        Mcp => "mcp",
        Skill => "skill",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Root persisted document under the agents home.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Globally selected version per agent.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<AgentKind, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repos: BTreeMap<String, RepoRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub registries: BTreeMap<RegistryKind, BTreeMap<String, RegistryEntry>>,
    /// Agents that share the central resources, when restricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<BTreeSet<AgentKind>>,
}

impl Meta {
    /// Fixed priority for a reserved slot name, if reserved.
    pub fn reserved_priority(slot: &str) -> Option<u32> {
        match slot {
            SYSTEM_SLOT => Some(SYSTEM_PRIORITY),
            USER_SLOT => Some(USER_PRIORITY),
            PROJECT_SLOT => Some(PROJECT_PRIORITY),
            _ => None,
        }
    }

    /// Priority to assign a new non-reserved slot: 20 + insertion order.
    pub fn next_slot_priority(&self) -> u32 {
        let extra = self
            .repos
            .keys()
            .filter(|k| Self::reserved_priority(k).is_none())
            .count() as u32;
        EXTRA_PRIORITY_BASE + extra
    }

    /// Repo slots sorted by ascending priority (stable by name on ties).
    pub fn repos_by_priority(&self) -> Vec<(&str, &RepoRecord)> {
        let mut slots: Vec<(&str, &RepoRecord)> = self
            .repos
            .iter()
            .map(|(name, rec)| (name.as_str(), rec))
            .collect();
        slots.sort_by(|a, b| a.1.priority.cmp(&b.1.priority).then(a.0.cmp(b.0)));
        slots
    }

    /// The active repo when a command names none: highest priority wins.
    pub fn highest_priority_repo(&self) -> Option<(&str, &RepoRecord)> {
        self.repos_by_priority().into_iter().next_back()
    }
}

crate::builder! {
    pub struct RepoRecordBuilder => RepoRecord {
        into {
            source: String = "gh:example/agents",
            branch: String = "main",
            commit: String = "",
            last_sync: String = "",
        }
        set {
            priority: u32 = 10,
            readonly: bool = false,
        }
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
