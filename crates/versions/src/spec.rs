// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `<agent>[@<version>]` install specs.

use agx_core::AgentKind;

/// Version label requesting the newest published release.
pub const LATEST: &str = "latest";

/// A parsed `<agent>[@<version>]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub agent: AgentKind,
    pub version: String,
}

/// Parse an install spec. Invalid agent names yield `None`; a missing
/// version means `latest`.
pub fn parse_spec(input: &str) -> Option<VersionSpec> {
    let input = input.trim();
    let (agent_str, version) = match input.split_once('@') {
        Some((agent, version)) if !version.is_empty() => (agent, version),
        Some(_) => return None,
        None => (input, LATEST),
    };
    let agent = AgentKind::parse(agent_str)?;
    Some(VersionSpec {
        agent,
        version: version.to_string(),
    })
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
