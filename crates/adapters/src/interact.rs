// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive prompt capability.
//!
//! The sync conflict loop asks one question per drifted resource; the
//! answer set is closed. Non-interactive runs (`--yes`, `--force`) and all
//! tests use [`AutoInteract`], which fulfils each request without blocking.

use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteractError {
    #[error("Cancelled")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answer to one drifted-resource conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Overwrite,
    Skip,
    CancelAll,
}

agx_core::simple_display! {
    ConflictChoice {
        Overwrite => "overwrite",
        Skip => "skip",
        CancelAll => "cancel",
    }
}

pub trait Interact: Send + Sync {
    /// Yes/no question; `default` is returned on plain Enter.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, InteractError>;

    /// Resolve one drifted resource.
    fn resolve_conflict(&self, description: &str) -> Result<ConflictChoice, InteractError>;
}

/// Deterministic adapter: every question gets the configured answer.
#[derive(Debug, Clone, Copy)]
pub struct AutoInteract {
    pub confirm_answer: bool,
    pub conflict_answer: ConflictChoice,
}

impl AutoInteract {
    /// `--force`: overwrite everything.
    pub fn overwrite_all() -> Self {
        Self {
            confirm_answer: true,
            conflict_answer: ConflictChoice::Overwrite,
        }
    }

    /// `--yes`: accept defaults, keep local changes.
    pub fn skip_conflicts() -> Self {
        Self {
            confirm_answer: true,
            conflict_answer: ConflictChoice::Skip,
        }
    }
}

impl Interact for AutoInteract {
    fn confirm(&self, _prompt: &str, _default: bool) -> Result<bool, InteractError> {
        Ok(self.confirm_answer)
    }

    fn resolve_conflict(&self, _description: &str) -> Result<ConflictChoice, InteractError> {
        Ok(self.conflict_answer)
    }
}

/// Line-based terminal prompts. EOF (Ctrl-D) and interrupt both surface as
/// [`InteractError::Cancelled`], which callers translate to a clean exit 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalInteract;

impl TerminalInteract {
    fn read_line(&self) -> Result<String, InteractError> {
        let mut line = String::new();
        let n = std::io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Err(InteractError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}

impl Interact for TerminalInteract {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, InteractError> {
        let hint = if default { "Y/n" } else { "y/N" };
        print!("{prompt} [{hint}] ");
        std::io::stdout().flush()?;
        let line = self.read_line()?;
        Ok(match line.to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn resolve_conflict(&self, description: &str) -> Result<ConflictChoice, InteractError> {
        loop {
            print!("{description}: [o]verwrite / [s]kip / [c]ancel all: ");
            std::io::stdout().flush()?;
            match self.read_line()?.to_lowercase().as_str() {
                "o" | "overwrite" => return Ok(ConflictChoice::Overwrite),
                "s" | "skip" | "" => return Ok(ConflictChoice::Skip),
                "c" | "cancel" => return Ok(ConflictChoice::CancelAll),
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
#[path = "interact_tests.rs"]
mod tests;
