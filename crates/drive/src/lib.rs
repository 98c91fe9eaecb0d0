// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! agx-drive: markdown knowledge stores ("drives") and the stdio MCP
//! server that exposes them to agents.

mod error;
mod model;
mod section;
mod server;
mod store;

pub use error::DriveError;
pub use model::{Drive, DriveBody, DriveFrontMatter};
pub use section::extract_section;
pub use server::{serve_stdio, DriveServer};
pub use store::{DriveStore, LARGE_FILE_BYTES, LARGE_DIR_FILES};
