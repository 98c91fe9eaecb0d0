// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The declarative job spec.

use agx_core::{parse_timeout, AgentKind, CronExpr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default timeout written into specs that omit one.
pub const DEFAULT_TIMEOUT: &str = "30m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    /// Read-only / suggest.
    #[default]
    Plan,
    /// Mutating / auto-approve.
    Edit,
}

agx_core::simple_display! {
    JobMode {
        Plan => "plan",
        Edit => "edit",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Fast,
    #[default]
    Default,
    Detailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirs: Vec<String>,
}

impl AllowList {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.sites.is_empty() && self.dirs.is_empty()
    }
}

/// One field-level validation failure. Errors are accumulated, never
/// first-fail, so the user sees every problem at once.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must be non-empty and filesystem-safe")]
    BadName,
    #[error("schedule: {0}")]
    BadSchedule(String),
    #[error("agent '{0}' does not support daemon jobs")]
    BadAgent(AgentKind),
    #[error("timeout: {0}")]
    BadTimeout(String),
    #[error("prompt must be non-empty")]
    EmptyPrompt,
}

/// A declarative scheduled job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    /// Five-field cron expression.
    pub schedule: String,
    pub agent: AgentKind,
    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub mode: JobMode,
    #[serde(default, skip_serializing_if = "is_default_effort")]
    pub effort: Effort,
    #[serde(default = "default_timeout", skip_serializing_if = "is_default_timeout")]
    pub timeout: String,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub enabled: bool,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "AllowList::is_empty")]
    pub allow: AllowList,
    /// Agent-specific keys (model etc.); values stay stringly typed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_yaml::Value>,
    /// Pinned agent version for this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn default_timeout() -> String {
    DEFAULT_TIMEOUT.to_string()
}

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_default_mode(m: &JobMode) -> bool {
    *m == JobMode::default()
}

fn is_default_effort(e: &Effort) -> bool {
    *e == Effort::default()
}

fn is_default_timeout(t: &String) -> bool {
    t == DEFAULT_TIMEOUT
}

impl JobSpec {
    /// Validate the spec, accumulating every error. A job with any error is
    /// rejected for write.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty()
            || self
                .name
                .chars()
                .any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        {
            errors.push(ValidationError::BadName);
        }
        if let Err(e) = CronExpr::parse(&self.schedule) {
            errors.push(ValidationError::BadSchedule(e.to_string()));
        }
        if !self.agent.supports_jobs() {
            errors.push(ValidationError::BadAgent(self.agent));
        }
        if let Err(e) = parse_timeout(&self.timeout) {
            errors.push(ValidationError::BadTimeout(e.to_string()));
        }
        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::EmptyPrompt);
        }

        errors
    }

    /// Parsed schedule. Only valid after `validate` passes.
    pub fn cron(&self) -> Result<CronExpr, agx_core::CronError> {
        CronExpr::parse(&self.schedule)
    }

    /// Parsed timeout. Only valid after `validate` passes.
    pub fn timeout_duration(&self) -> Result<std::time::Duration, agx_core::TimeoutError> {
        parse_timeout(&self.timeout)
    }

    /// The `model` config key, common to all agents.
    pub fn model(&self) -> Option<&str> {
        self.config.get("model").and_then(|v| v.as_str())
    }
}

agx_core::builder! {
    pub struct JobSpecBuilder => JobSpec {
        into {
            name: String = "nightly",
            schedule: String = "0 3 * * *",
            prompt: String = "Summarize recent activity.",
            timeout: String = DEFAULT_TIMEOUT,
        }
        set {
            agent: AgentKind = AgentKind::Claude,
            mode: JobMode = JobMode::Plan,
            effort: Effort = Effort::Default,
            enabled: bool = true,
            allow: AllowList = AllowList::default(),
            config: BTreeMap<String, serde_yaml::Value> = BTreeMap::new(),
        }
        option {
            version: String = None,
        }
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
