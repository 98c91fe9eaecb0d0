// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown section extraction, with an optional `mq` fast path.

use crate::error::DriveError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.+?)\s*$").expect("constant regex pattern is valid")
});

/// Timeout for `mq` subprocess calls.
pub const MQ_TIMEOUT: Duration = Duration::from_secs(10);

/// True when the external `mq` helper is available.
pub fn mq_available() -> bool {
    agx_adapters::find_on_path("mq").is_some()
}

/// Structural outline of a markdown document via `mq`.
pub async fn mq_outline(path: &Path) -> Result<String, DriveError> {
    run_mq(&[&path.display().to_string(), ".tree(\"full\")"]).await
}

/// Section text via `mq`.
pub async fn mq_section(path: &Path, section: &str) -> Result<String, DriveError> {
    let query = format!(".section(\"{}\") | .text", section.replace('"', "\\\""));
    run_mq(&[&path.display().to_string(), &query]).await
}

async fn run_mq(args: &[&str]) -> Result<String, DriveError> {
    let mut cmd = tokio::process::Command::new("mq");
    cmd.args(args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());

    let output = tokio::time::timeout(MQ_TIMEOUT, cmd.output())
        .await
        .map_err(|_| DriveError::Mq("timed out".to_string()))?
        .map_err(|e| DriveError::Mq(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DriveError::Mq(
            stderr.lines().next().unwrap_or("non-zero exit").to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Pure-markdown fallback: return the body of the heading matching
/// `section`, up to (but not including) the next heading of equal or
/// shallower depth.
pub fn extract_section(content: &str, section: &str) -> Result<String, DriveError> {
    let mut depth = 0usize;
    let mut collected: Vec<&str> = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        if let Some(caps) = HEADING.captures(line) {
            let this_depth = caps[1].len();
            if in_section {
                if this_depth <= depth {
                    break;
                }
            } else if caps[2].eq_ignore_ascii_case(section.trim()) {
                in_section = true;
                depth = this_depth;
                collected.push(line);
                continue;
            }
        }
        if in_section {
            collected.push(line);
        }
    }

    if !in_section {
        return Err(DriveError::SectionNotFound(section.to_string()));
    }
    Ok(collected.join("\n").trim().to_string())
}

#[cfg(test)]
#[path = "section_tests.rs"]
mod tests;
