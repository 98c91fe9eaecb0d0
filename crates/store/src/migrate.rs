// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot migrations from the two legacy state formats.
//!
//! (a) Older YAML kept repo slots under `scopes` and per-agent defaults
//!     under `versions.{agent}.default`.
//! (b) The oldest installs kept a JSON `state.json` with a single repo.

use agx_core::{Meta, RepoRecord, USER_SLOT};
use serde_yaml::Value;

/// Parse meta YAML, transparently migrating the legacy shape.
///
/// Returns the document plus a flag indicating whether a migration was
/// applied (so the caller can persist the modern form).
pub(crate) fn parse_meta_yaml(content: &str) -> Result<(Meta, bool), serde_yaml::Error> {
    let mut value: Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Ok((Meta::default(), false));
    }

    let migrated = migrate_value(&mut value);
    let meta: Meta = serde_yaml::from_value(value)?;
    Ok((meta, migrated))
}

fn migrate_value(value: &mut Value) -> bool {
    let Some(map) = value.as_mapping_mut() else {
        return false;
    };
    let mut migrated = false;

    // `scopes` → `repos`
    if let Some(scopes) = map.remove("scopes") {
        if !map.contains_key("repos") {
            map.insert("repos".into(), scopes);
        }
        migrated = true;
    }

    // `versions.{agent}.default` → `agents.{agent}`
    if let Some(versions) = map.remove("versions") {
        if let Some(versions) = versions.as_mapping() {
            let mut agents = serde_yaml::Mapping::new();
            for (agent, spec) in versions {
                let default = spec
                    .as_mapping()
                    .and_then(|m| m.get("default"))
                    .cloned()
                    .or_else(|| spec.as_str().map(|s| Value::from(s.to_string())));
                if let Some(v) = default {
                    agents.insert(agent.clone(), v);
                }
            }
            if !map.contains_key("agents") && !agents.is_empty() {
                map.insert("agents".into(), Value::Mapping(agents));
            }
        }
        migrated = true;
    }

    migrated
}

/// Synthesize a meta document from the legacy JSON state file.
///
/// The old file carried a single repo; it becomes the `user` slot. Any
/// parse failure yields `None` and the caller falls back to defaults.
pub(crate) fn from_legacy_state_json(content: &str) -> Option<Meta> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let obj = value.as_object()?;

    let source = obj
        .get("repo")
        .or_else(|| obj.get("configRepo"))
        .and_then(|v| v.as_str())?;

    let mut meta = Meta::default();
    meta.repos.insert(
        USER_SLOT.to_string(),
        RepoRecord {
            source: source.to_string(),
            branch: obj
                .get("branch")
                .and_then(|v| v.as_str())
                .unwrap_or("main")
                .to_string(),
            commit: obj
                .get("commit")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            last_sync: obj
                .get("lastSync")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            priority: 10,
            readonly: false,
        },
    );
    Some(meta)
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
