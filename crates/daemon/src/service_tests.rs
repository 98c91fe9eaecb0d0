// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn launchd_plist_invokes_hidden_run_subcommand() {
    let home = TempDir::new().unwrap();
    let host = LaunchdHost::new(home.path().to_path_buf());
    host.install(Path::new("/usr/local/bin/agx")).unwrap();

    let path = host.descriptor_path();
    assert!(path.ends_with("Library/LaunchAgents/dev.agx.daemon.plist"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("<string>/usr/local/bin/agx</string>"));
    assert!(content.contains("<string>daemon</string>"));
    assert!(content.contains("<string>_run</string>"));
    // Restart-on-failure semantics
    assert!(content.contains("KeepAlive"));
    assert!(content.contains("SuccessfulExit"));
}

#[test]
fn systemd_unit_restarts_on_failure() {
    let home = TempDir::new().unwrap();
    let host = SystemdUserHost::new(home.path().to_path_buf());
    host.install(Path::new("/usr/bin/agx")).unwrap();

    let path = host.descriptor_path();
    assert!(path.ends_with(".config/systemd/user/agx-daemon.service"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("ExecStart=/usr/bin/agx daemon _run"));
    assert!(content.contains("Restart=on-failure"));
}

#[test]
fn uninstall_is_idempotent() {
    let home = TempDir::new().unwrap();
    let host = SystemdUserHost::new(home.path().to_path_buf());
    host.install(Path::new("/usr/bin/agx")).unwrap();
    host.uninstall().unwrap();
    host.uninstall().unwrap();
    assert!(!host.descriptor_path().exists());
}

#[test]
fn native_host_exists_on_linux_and_macos() {
    let home = TempDir::new().unwrap();
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    assert!(native_host(home.path()).is_some());
}
