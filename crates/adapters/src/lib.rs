// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! agx-adapters: the external collaborators the core consumes, behind
//! traits so every caller can be tested against a Fake.
//!
//! Git transport, interactive prompts, registry HTTP clients, the
//! markdown → TOML command conversion, and subprocess execution.

pub mod convert;
pub mod git;
pub mod interact;
pub mod process;
pub mod registry;

pub use convert::{markdown_to_toml, split_front_matter};
pub use git::{GitAdapter, GitCli, GitError, GitSync};
#[cfg(any(test, feature = "test-support"))]
pub use git::FakeGit;
pub use interact::{AutoInteract, ConflictChoice, Interact, InteractError, TerminalInteract};
pub use process::{
    find_on_path, ProcessOutput, ProcessRequest, ProcessRunner, SystemProcessRunner,
};
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessRunner;
pub use registry::{
    HttpRegistryClient, RegistryClient, RegistryError, ResolvedPackage, SearchHit,
    UPDATE_PROBE_TIMEOUT,
};
#[cfg(any(test, feature = "test-support"))]
pub use registry::FakeRegistryClient;
