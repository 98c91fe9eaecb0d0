// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run ids, slugs, and path expansion helpers.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Build a run id from a wall-clock timestamp.
///
/// The id is the ISO-8601 instant with `:` and `.` replaced by `-`, so ids
/// stay filesystem-safe and lexicographic order coincides with real-time
/// order.
pub fn run_id(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// Slugify a title for use as a filename component.
///
/// Lowercases, collapses runs of non-alphanumerics into single hyphens,
/// and trims leading/trailing hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true;
    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Expand a leading `~` or `~/` to the given home directory.
///
/// Paths without a tilde prefix are returned unchanged.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
