// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt template placeholders.
//!
//! `{day}`, `{date}`, `{time}`, `{job_name}`, and `{last_report}` are
//! substituted; anything else is left untouched.

use chrono::{DateTime, Utc};

/// Literal used when a job has no previous report.
pub const NO_PREVIOUS_REPORT: &str = "(no previous report)";

/// Resolve the template placeholders in a job prompt.
pub fn render_prompt(
    prompt: &str,
    job_name: &str,
    last_report: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    prompt
        .replace("{day}", &now.format("%A").to_string())
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
        .replace("{time}", &now.format("%H:%M:%S").to_string())
        .replace("{job_name}", job_name)
        .replace("{last_report}", last_report.unwrap_or(NO_PREVIOUS_REPORT))
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
