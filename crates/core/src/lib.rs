// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! agx-core: core types for the agx meta-CLI.
//!
//! Agent descriptors, repo references, the persisted meta document,
//! manifests, cron schedules, and the clock abstraction everything
//! time-dependent is threaded through.

pub mod macros;

pub mod agent;
pub mod clock;
pub mod cron;
pub mod duration;
pub mod manifest;
pub mod meta;
pub mod naming;
pub mod repo;

pub use agent::{AgentKind, AgentInfo, Capability, CommandFormat, SHARED_INSTRUCTIONS};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use cron::{CronError, CronExpr};
pub use duration::{format_timeout, parse_timeout, TimeoutError};
pub use manifest::{
    find_project_manifest, DriveDecl, Manifest, ManifestError, McpEntry, McpScope, McpTransport,
    SyncDefaults, SyncMethod, SyncScope, PROJECT_MANIFEST_DIR, REPO_MANIFEST_NAME,
};
pub use meta::{
    Meta, RegistryEntry, RegistryKind, RepoRecord, PROJECT_SLOT, SYSTEM_SLOT, USER_SLOT,
};
pub use naming::{expand_tilde, run_id, slugify};
pub use repo::{RepoParseError, RepoRef, RepoSource};
