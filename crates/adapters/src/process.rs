// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution behind a trait so installs and MCP registration
//! never spawn real binaries in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Short human-readable failure summary: last stderr line, else status.
    pub fn failure_summary(&self) -> String {
        self.stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with status {}", self.status))
    }
}

/// Invocation request for [`ProcessRunner::run`].
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub envs: HashMap<String, String>,
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, request: ProcessRequest) -> std::io::Result<ProcessOutput>;
}

impl ProcessRequest {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: None,
            envs: HashMap::new(),
        }
    }

    agx_core::setters! {
        set {
            envs: HashMap<String, String>,
            args: Vec<String>,
        }
        option {
            cwd: PathBuf,
        }
    }
}

/// Real runner using `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, request: ProcessRequest) -> std::io::Result<ProcessOutput> {
        let mut cmd = tokio::process::Command::new(&request.program);
        cmd.args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &request.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &request.envs {
            cmd.env(k, v);
        }
        let output = cmd.output().await?;
        Ok(ProcessOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Scripted runner for tests: responses are matched by program name and
/// served in order; every call is recorded for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeProcessRunner {
    calls: std::sync::Arc<parking_lot::Mutex<Vec<ProcessRequest>>>,
    responses: std::sync::Arc<parking_lot::Mutex<Vec<(String, ProcessOutput)>>>,
    side_effects: std::sync::Arc<parking_lot::Mutex<Vec<Box<dyn FnMut(&ProcessRequest) + Send>>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call whose program matches.
    pub fn respond(&self, program: &str, status: i32, stdout: &str, stderr: &str) {
        self.responses.lock().push((
            program.to_string(),
            ProcessOutput {
                status,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
    }

    /// Register a hook invoked on every call, e.g. to create the files a
    /// real installer would have produced.
    pub fn on_call(&self, f: impl FnMut(&ProcessRequest) + Send + 'static) {
        self.side_effects.lock().push(Box::new(f));
    }

    pub fn calls(&self) -> Vec<ProcessRequest> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, program: &str) -> Vec<ProcessRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn run(&self, request: ProcessRequest) -> std::io::Result<ProcessOutput> {
        for effect in self.side_effects.lock().iter_mut() {
            effect(&request);
        }
        self.calls.lock().push(request.clone());
        let mut responses = self.responses.lock();
        if let Some(pos) = responses.iter().position(|(p, _)| *p == request.program) {
            let (_, output) = responses.remove(pos);
            return Ok(output);
        }
        // Unscripted programs succeed quietly
        Ok(ProcessOutput {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Resolve a program on PATH, mirroring `which`.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
