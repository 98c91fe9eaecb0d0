// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! New / in-sync / drifted classification.

use agx_adapters::markdown_to_toml;
use std::path::Path;

/// State of one (resource, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Target does not exist locally.
    New,
    /// Target exists and normalized content matches.
    InSync,
    /// Target exists and differs.
    Drifted,
}

agx_core::simple_display! {
    SyncState {
        New => "new",
        InSync => "in sync",
        Drifted => "drifted",
    }
}

/// Normalize content for comparison: CRLF → LF, outer whitespace trimmed.
pub fn normalize_content(content: &str) -> String {
    content.replace("\r\n", "\n").trim().to_string()
}

/// Classify source content against optional local content.
pub fn classify_content(source: &str, local: Option<&str>) -> SyncState {
    match local {
        None => SyncState::New,
        Some(local) if normalize_content(source) == normalize_content(local) => SyncState::InSync,
        Some(_) => SyncState::Drifted,
    }
}

/// Classify a markdown source file against a target path.
///
/// When the target is a `.toml` file (a TOML-format agent's rendition of a
/// markdown command), the comparison runs against the post-conversion TOML.
pub fn classify_file(source: &Path, target: &Path, name: &str) -> SyncState {
    let Ok(source_content) = std::fs::read_to_string(source) else {
        // Unreadable sources surface as drift so the user sees them
        return SyncState::Drifted;
    };
    let local = std::fs::read_to_string(target).ok();
    if local.is_none() {
        return SyncState::New;
    }

    let effective_source = if target.extension().and_then(|e| e.to_str()) == Some("toml") {
        markdown_to_toml(name, &source_content)
    } else {
        source_content
    };
    classify_content(&effective_source, local.as_deref())
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
