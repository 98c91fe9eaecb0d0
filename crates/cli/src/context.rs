// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation context threaded through the command handlers.
//!
//! Nothing is global: the store handle, adapters, and clock are built
//! once in `main` and passed down, so command code stays testable against
//! fakes.

use crate::exit_error::ExitError;
use agx_adapters::{GitCli, SystemProcessRunner};
use agx_core::SystemClock;
use agx_store::Store;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Context {
    pub store: Store,
    pub clock: SystemClock,
    pub runner: Arc<SystemProcessRunner>,
    pub git: Arc<GitCli>,
    /// Real user home directory.
    pub user_home: PathBuf,
}

impl Context {
    pub fn new() -> Result<Self, ExitError> {
        let store = Store::open().map_err(|e| ExitError::fatal(e.to_string()))?;
        let user_home =
            dirs::home_dir().ok_or_else(|| ExitError::fatal("could not determine home directory"))?;
        let runner = Arc::new(SystemProcessRunner);
        let git = Arc::new(GitCli::new(runner.clone()));
        Ok(Self {
            store,
            clock: SystemClock,
            runner,
            git,
            user_home,
        })
    }

    pub fn drives(&self) -> agx_drive::DriveStore {
        agx_drive::DriveStore::new(self.store.clone(), self.user_home.clone())
    }

    pub fn versions(&self) -> agx_versions::VersionManager {
        agx_versions::VersionManager::new(self.store.clone(), self.runner.clone())
    }
}

/// Sync's reload hook, wired to the daemon's SIGHUP.
pub struct DaemonReload {
    pub store: Store,
}

impl agx_sync::ReloadSignal for DaemonReload {
    fn reload(&self) {
        if let Err(e) = agx_daemon::signal_reload(&self.store) {
            tracing::debug!(error = %e, "daemon not reloaded");
        }
    }
}
