// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five-field cron expressions (minute hour day-of-month month day-of-week).
//!
//! Fields accept `*`, comma lists, ranges, and `*/step` / `a-b/step`.
//! Month and weekday fields also accept three-letter names. Day-of-month
//! and day-of-week OR together when both are restricted, matching classic
//! cron semantics.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronError {
    #[error("expected 5 fields, got {0}")]
    FieldCount(usize),
    #[error("invalid cron expression: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// A parsed cron schedule. Evaluation is at minute resolution, in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CronExpr {
    source: String,
    minutes: u64,
    hours: u32,
    days_of_month: u32,
    months: u16,
    days_of_week: u8,
    dom_restricted: bool,
    dow_restricted: bool,
}

impl TryFrom<String> for CronExpr {
    type Error = CronError;
    fn try_from(s: String) -> Result<Self, CronError> {
        Self::parse(&s)
    }
}

impl From<CronExpr> for String {
    fn from(c: CronExpr) -> String {
        c.source
    }
}

impl std::fmt::Display for CronExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl CronExpr {
    /// Parse a five-field expression. Field errors are accumulated so the
    /// caller can report every problem at once.
    pub fn parse(input: &str) -> Result<Self, CronError> {
        let fields: Vec<&str> = input.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronError::FieldCount(fields.len()));
        }

        let mut errors = Vec::new();
        let minutes = parse_field(fields[0], 0, 59, None)
            .map_err(|e| errors.push(format!("minute: {e}")))
            .unwrap_or_default();
        let hours = parse_field(fields[1], 0, 23, None)
            .map_err(|e| errors.push(format!("hour: {e}")))
            .unwrap_or_default();
        let dom = parse_field(fields[2], 1, 31, None)
            .map_err(|e| errors.push(format!("day-of-month: {e}")))
            .unwrap_or_default();
        let months = parse_field(fields[3], 1, 12, Some(&MONTH_NAMES))
            .map_err(|e| errors.push(format!("month: {e}")))
            .unwrap_or_default();
        let dow = parse_field(fields[4], 0, 7, Some(&DAY_NAMES))
            .map_err(|e| errors.push(format!("day-of-week: {e}")))
            .unwrap_or_default();

        if !errors.is_empty() {
            return Err(CronError::Invalid(errors));
        }

        // 7 is an alias for Sunday
        let mut dow_bits = (dow & 0x7f) as u8;
        if dow & (1 << 7) != 0 {
            dow_bits |= 1;
        }

        Ok(Self {
            source: fields.join(" "),
            minutes,
            hours: hours as u32,
            days_of_month: dom as u32,
            months: months as u16,
            days_of_week: dow_bits,
            dom_restricted: fields[2] != "*",
            dow_restricted: fields[4] != "*",
        })
    }

    /// Next instant strictly after `after` matching the schedule, or `None`
    /// if no match exists within a four-year search horizon.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = truncate_to_minute(after) + Duration::minutes(1);
        let horizon = start + Duration::days(366 * 4);

        let mut day = start.date_naive();
        while Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?) < horizon {
            if self.day_matches(day) {
                let from = if day == start.date_naive() {
                    Some((start.hour(), start.minute()))
                } else {
                    None
                };
                if let Some((h, m)) = self.first_time_in_day(from) {
                    return day
                        .and_hms_opt(h, m, 0)
                        .map(|naive| Utc.from_utc_datetime(&naive));
                }
            }
            day = day.succ_opt()?;
        }
        None
    }

    fn day_matches(&self, day: chrono::NaiveDate) -> bool {
        if self.months & (1 << day.month()) == 0 {
            return false;
        }
        let dom_ok = self.days_of_month & (1 << day.day()) != 0;
        let dow_ok = self.days_of_week & (1 << day.weekday().num_days_from_sunday()) != 0;
        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom_ok || dow_ok,
            (true, false) => dom_ok,
            (false, true) => dow_ok,
            (false, false) => true,
        }
    }

    /// Earliest (hour, minute) in the day at or after `from`
    /// (`None` means start of day).
    fn first_time_in_day(&self, from: Option<(u32, u32)>) -> Option<(u32, u32)> {
        let (from_h, from_m) = from.unwrap_or((0, 0));
        for h in from_h..24 {
            if self.hours & (1 << h) == 0 {
                continue;
            }
            let min_start = if h == from_h { from_m } else { 0 };
            for m in min_start..60 {
                if self.minutes & (1 << m) != 0 {
                    return Some((h, m));
                }
            }
        }
        None
    }
}

fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t - Duration::nanoseconds(i64::from(t.nanosecond())) - Duration::seconds(i64::from(t.second()))
}

/// Parse one cron field into a bitmask over `[min, max]`.
fn parse_field(
    field: &str,
    min: u32,
    max: u32,
    names: Option<&[&str]>,
) -> Result<u64, String> {
    if field.is_empty() {
        return Err("empty field".to_string());
    }
    let mut bits: u64 = 0;
    for part in field.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((r, s)) => {
                let step: u32 = s
                    .parse()
                    .map_err(|_| format!("invalid step '{s}'"))?;
                if step == 0 {
                    return Err("step must be non-zero".to_string());
                }
                (r, step)
            }
            None => (part, 1),
        };
        let (lo, hi) = if range == "*" {
            (min, max)
        } else if let Some((a, b)) = range.split_once('-') {
            (
                parse_value(a, min, max, names)?,
                parse_value(b, min, max, names)?,
            )
        } else {
            let v = parse_value(range, min, max, names)?;
            // A bare value with a step means "from v to max"
            if step > 1 {
                (v, max)
            } else {
                (v, v)
            }
        };
        if lo > hi {
            return Err(format!("range '{range}' is reversed"));
        }
        let mut v = lo;
        while v <= hi {
            bits |= 1 << v;
            v += step;
        }
    }
    Ok(bits)
}

fn parse_value(s: &str, min: u32, max: u32, names: Option<&[&str]>) -> Result<u32, String> {
    if let Some(names) = names {
        if let Some(idx) = names.iter().position(|n| n.eq_ignore_ascii_case(s)) {
            // Name tables are zero-based for weekdays, one-based for months
            return Ok(idx as u32 + min.min(1));
        }
    }
    let v: u32 = s
        .parse()
        .map_err(|_| format!("invalid value '{s}'"))?;
    if v < min || v > max {
        return Err(format!("value {v} out of range {min}-{max}"));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
