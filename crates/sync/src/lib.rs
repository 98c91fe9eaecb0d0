// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! agx-sync: reconcile a config repo with the local install.
//!
//! A sync run discovers the repo's declared resources, classifies each
//! (resource, target agent) pair as new / in-sync / drifted, resolves
//! drift through the interactive capability, applies the decisions into
//! the central store, registers MCP servers, and fans the result out into
//! every selected per-version home.

mod apply;
mod classify;
mod discover;
mod engine;
mod error;
mod mcp;

pub use classify::{classify_content, classify_file, normalize_content, SyncState};
pub use discover::{
    discover, Discovery, DiscoveredCommand, DiscoveredDrive, DiscoveredHook, DiscoveredJob,
    DiscoveredMemory, DiscoveredSkill, SkillMeta,
};
pub use engine::{NoReload, ReloadSignal, SyncEngine, SyncOptions, SyncOutcome, SyncSummary};
pub use error::SyncError;
pub use mcp::{register_mcp, unregister_mcp, registered_mcp_names};
