// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agx drive`: manage context drives and serve them over MCP.

use crate::context::Context;
use crate::exit_error::ExitError;
use agx_drive::{serve_stdio, DriveBody};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum DriveCmd {
    /// List drives
    List,
    /// Create a new drive
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Project path this drive describes
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Print a drive's content
    Show { name: String },
    /// Append a note to a drive
    Note {
        name: String,
        title: String,
        content: String,
    },
    /// Delete a drive
    Remove { name: String },
    /// Serve the drive library over stdio MCP (used by agent configs)
    Serve,
}

pub async fn run(ctx: &Context, cmd: DriveCmd) -> Result<(), ExitError> {
    let drives = ctx.drives();
    match cmd {
        DriveCmd::List => {
            let all = drives.list();
            if all.is_empty() {
                println!("no drives");
                return Ok(());
            }
            for drive in all {
                let kind = match drive.body {
                    DriveBody::File => "file",
                    DriveBody::Directory => "dir",
                };
                match &drive.front.description {
                    Some(desc) => println!("{:<20} [{kind}] {desc}", drive.name),
                    None => println!("{:<20} [{kind}]", drive.name),
                }
            }
            Ok(())
        }
        DriveCmd::Create {
            name,
            description,
            project,
        } => {
            drives
                .create(
                    &name,
                    description.as_deref(),
                    project.as_deref(),
                    &ctx.clock,
                )
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("created drive {name}");
            Ok(())
        }
        DriveCmd::Show { name } => {
            let drive = drives
                .get(&name)
                .ok_or_else(|| ExitError::fatal(format!("drive '{name}' not found")))?;
            let content = drives
                .read_content(&drive)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            print!("{content}");
            Ok(())
        }
        DriveCmd::Note {
            name,
            title,
            content,
        } => {
            let path = drives
                .add_note(&name, &title, &content, &ctx.clock)
                .map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("noted: {}", path.display());
            Ok(())
        }
        DriveCmd::Remove { name } => {
            let drive = drives
                .get(&name)
                .ok_or_else(|| ExitError::fatal(format!("drive '{name}' not found")))?;
            let result = match drive.body {
                DriveBody::File => std::fs::remove_file(&drive.path),
                DriveBody::Directory => std::fs::remove_dir_all(&drive.path),
            };
            result.map_err(|e| ExitError::fatal(e.to_string()))?;
            println!("removed drive {name}");
            Ok(())
        }
        DriveCmd::Serve => serve_stdio(drives)
            .await
            .map_err(|e| ExitError::fatal(e.to_string())),
    }
}
