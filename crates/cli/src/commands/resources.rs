// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Central resource subtrees: commands, skills, hooks, memory.

use crate::context::Context;
use crate::exit_error::ExitError;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum CommandsCmd {
    /// List central command files
    List,
    /// Print one command file
    Show { name: String },
    /// Delete a central command file
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum SkillsCmd {
    /// List central skills
    List,
    /// Delete a central skill
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum HooksCmd {
    /// List central hooks
    List,
    /// Delete a central hook
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum MemoryCmd {
    /// List central memory files
    List,
    /// Print one memory file
    Show { name: String },
    /// Delete a central memory file
    Remove { name: String },
}

pub fn commands(ctx: &Context, cmd: CommandsCmd) -> Result<(), ExitError> {
    match cmd {
        CommandsCmd::List => list_files(&ctx.store.commands_dir(), "commands"),
        CommandsCmd::Show { name } => show_file(&ctx.store.commands_dir().join(format!("{name}.md"))),
        CommandsCmd::Remove { name } => {
            remove_file(&ctx.store.commands_dir().join(format!("{name}.md")))
        }
    }
}

pub fn skills(ctx: &Context, cmd: SkillsCmd) -> Result<(), ExitError> {
    match cmd {
        SkillsCmd::List => list_dirs(&ctx.store.skills_dir(), "skills"),
        SkillsCmd::Remove { name } => {
            let path = ctx.store.skills_dir().join(&name);
            if !path.is_dir() {
                return Err(ExitError::fatal(format!("skill '{name}' not found")));
            }
            std::fs::remove_dir_all(&path).map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("removed skill {name}");
            Ok(())
        }
    }
}

pub fn hooks(ctx: &Context, cmd: HooksCmd) -> Result<(), ExitError> {
    match cmd {
        HooksCmd::List => list_files(&ctx.store.hooks_dir(), "hooks"),
        HooksCmd::Remove { name } => remove_file(&ctx.store.hooks_dir().join(&name)),
    }
}

pub fn memory(ctx: &Context, cmd: MemoryCmd) -> Result<(), ExitError> {
    match cmd {
        MemoryCmd::List => list_files(&ctx.store.memory_dir(), "memory files"),
        MemoryCmd::Show { name } => show_file(&ctx.store.memory_dir().join(&name)),
        MemoryCmd::Remove { name } => remove_file(&ctx.store.memory_dir().join(&name)),
    }
}

fn list_files(dir: &Path, what: &str) -> Result<(), ExitError> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect(),
        Err(_) => Vec::new(),
    };
    if names.is_empty() {
        println!("no {what} installed");
        return Ok(());
    }
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn list_dirs(dir: &Path, what: &str) -> Result<(), ExitError> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect(),
        Err(_) => Vec::new(),
    };
    if names.is_empty() {
        println!("no {what} installed");
        return Ok(());
    }
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn show_file(path: &Path) -> Result<(), ExitError> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| ExitError::fatal(format!("{} not found", path.display())))?;
    print!("{content}");
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), ExitError> {
    if !path.is_file() {
        return Err(ExitError::fatal(format!("{} not found", path.display())));
    }
    std::fs::remove_file(path).map_err(|e| ExitError::fatal(e.to_string()))?;
    println!("removed {}", path.display());
    Ok(())
}
