// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job timeout strings: `NhNm` with either or both units, non-zero.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("empty timeout string")]
    Empty,
    #[error("invalid timeout '{0}': expected forms like '30m', '2h', '1h30m'")]
    Invalid(String),
    #[error("timeout '{0}' must be non-zero")]
    Zero(String),
}

/// Parse a timeout string like `30m`, `2h`, or `1h30m` into a [`Duration`].
pub fn parse_timeout(s: &str) -> Result<Duration, TimeoutError> {
    let input = s.trim();
    if input.is_empty() {
        return Err(TimeoutError::Empty);
    }

    let mut total_secs: u64 = 0;
    let mut seen_hours = false;
    let mut seen_minutes = false;
    let mut digits = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| TimeoutError::Invalid(s.to_string()))?;
        digits.clear();
        match ch {
            'h' if !seen_hours && !seen_minutes => {
                seen_hours = true;
                total_secs += value * 3600;
            }
            'm' if !seen_minutes => {
                seen_minutes = true;
                total_secs += value * 60;
            }
            _ => return Err(TimeoutError::Invalid(s.to_string())),
        }
    }
    if !digits.is_empty() {
        // Trailing digits without a unit
        return Err(TimeoutError::Invalid(s.to_string()));
    }
    if !seen_hours && !seen_minutes {
        return Err(TimeoutError::Invalid(s.to_string()));
    }
    if total_secs == 0 {
        return Err(TimeoutError::Zero(s.to_string()));
    }
    Ok(Duration::from_secs(total_secs))
}

/// Render a duration back to the `NhNm` form used in job files.
pub fn format_timeout(d: Duration) -> String {
    let total_mins = d.as_secs() / 60;
    let hours = total_mins / 60;
    let mins = total_mins % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
