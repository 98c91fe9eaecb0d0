// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform service hosting for the daemon.
//!
//! One abstraction, two native back-ends (launchd on macOS, systemd user
//! units on Linux), and a detached-process fallback for everything else.
//! Every descriptor invokes the hidden `agx daemon _run` subcommand and
//! restarts on failure.

use crate::error::{io_err, DaemonError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reverse-DNS label for the launchd plist.
pub const LAUNCHD_LABEL: &str = "dev.agx.daemon";
/// Unit name for the systemd user service.
pub const SYSTEMD_UNIT: &str = "agx-daemon";

pub trait ServiceHost: Send + Sync {
    /// Write the service descriptor pointing at `exe`.
    fn install(&self, exe: &Path) -> Result<(), DaemonError>;
    fn uninstall(&self) -> Result<(), DaemonError>;
    /// Ask the OS to start the service.
    fn start(&self) -> Result<(), DaemonError>;
    fn stop(&self) -> Result<(), DaemonError>;
    /// Path of the descriptor this host manages.
    fn descriptor_path(&self) -> PathBuf;
}

/// launchd user agent (macOS).
pub struct LaunchdHost {
    user_home: PathBuf,
}

impl LaunchdHost {
    pub fn new(user_home: PathBuf) -> Self {
        Self { user_home }
    }

    fn plist(exe: &Path) -> String {
        let exe = exe.display();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LAUNCHD_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
        <string>daemon</string>
        <string>_run</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <dict>
        <key>SuccessfulExit</key>
        <false/>
    </dict>
</dict>
</plist>
"#
        )
    }
}

impl ServiceHost for LaunchdHost {
    fn descriptor_path(&self) -> PathBuf {
        self.user_home
            .join("Library/LaunchAgents")
            .join(format!("{LAUNCHD_LABEL}.plist"))
    }

    fn install(&self, exe: &Path) -> Result<(), DaemonError> {
        let path = self.descriptor_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
        }
        std::fs::write(&path, Self::plist(exe)).map_err(|e| io_err("write", &path, e))
    }

    fn uninstall(&self) -> Result<(), DaemonError> {
        let path = self.descriptor_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &path, e)),
        }
    }

    fn start(&self) -> Result<(), DaemonError> {
        run_host_command(
            "launchctl",
            &["load", "-w", &self.descriptor_path().display().to_string()],
        )
    }

    fn stop(&self) -> Result<(), DaemonError> {
        run_host_command(
            "launchctl",
            &["unload", &self.descriptor_path().display().to_string()],
        )
    }
}

/// systemd user unit (Linux).
pub struct SystemdUserHost {
    user_home: PathBuf,
}

impl SystemdUserHost {
    pub fn new(user_home: PathBuf) -> Self {
        Self { user_home }
    }

    fn unit(exe: &Path) -> String {
        let exe = exe.display();
        format!(
            "[Unit]\n\
             Description=agx scheduler daemon\n\
             \n\
             [Service]\n\
             ExecStart={exe} daemon _run\n\
             Restart=on-failure\n\
             RestartSec=5\n\
             \n\
             [Install]\n\
             WantedBy=default.target\n"
        )
    }
}

impl ServiceHost for SystemdUserHost {
    fn descriptor_path(&self) -> PathBuf {
        self.user_home
            .join(".config/systemd/user")
            .join(format!("{SYSTEMD_UNIT}.service"))
    }

    fn install(&self, exe: &Path) -> Result<(), DaemonError> {
        let path = self.descriptor_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, e))?;
        }
        std::fs::write(&path, Self::unit(exe)).map_err(|e| io_err("write", &path, e))
    }

    fn uninstall(&self) -> Result<(), DaemonError> {
        let path = self.descriptor_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &path, e)),
        }
    }

    fn start(&self) -> Result<(), DaemonError> {
        run_host_command("systemctl", &["--user", "daemon-reload"])?;
        run_host_command("systemctl", &["--user", "start", SYSTEMD_UNIT])
    }

    fn stop(&self) -> Result<(), DaemonError> {
        run_host_command("systemctl", &["--user", "stop", SYSTEMD_UNIT])
    }
}

/// Fallback: spawn the daemon as a plain detached child.
pub struct DetachedProcess;

impl DetachedProcess {
    pub fn spawn(exe: &Path) -> Result<u32, DaemonError> {
        let child = Command::new(exe)
            .args(["daemon", "_run"])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| io_err("spawn", exe, e))?;
        Ok(child.id())
    }
}

/// The native host for this platform, when one exists.
pub fn native_host(user_home: &Path) -> Option<Box<dyn ServiceHost>> {
    #[cfg(target_os = "macos")]
    {
        Some(Box::new(LaunchdHost::new(user_home.to_path_buf())))
    }
    #[cfg(target_os = "linux")]
    {
        Some(Box::new(SystemdUserHost::new(user_home.to_path_buf())))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = user_home;
        None
    }
}

fn run_host_command(program: &str, args: &[&str]) -> Result<(), DaemonError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| io_err("spawn", Path::new(program), e))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DaemonError::Io {
            action: "run",
            path: PathBuf::from(program),
            source: std::io::Error::other(stderr.trim().to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
