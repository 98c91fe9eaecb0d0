// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! agx: one CLI for every coding agent.

mod commands;
mod context;
mod exit_error;

use clap::{Parser, Subcommand};
use context::Context;
use exit_error::ExitError;

#[derive(Parser)]
#[command(
    name = "agx",
    version,
    about = "Manage AI coding agent CLIs: versions, config sync, scheduled jobs, and context drives"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show installed agents, repos, and daemon state
    Status {
        /// Restrict to one agent
        agent: Option<String>,
    },
    /// Sync a config repo into the local install
    Pull(commands::pull::PullArgs),
    /// Export local resources back to the config repo
    Push(commands::push::PushArgs),
    /// Install an agent version (agent[@version])
    Add {
        spec: String,
        /// Pin in the project manifest instead of globally
        #[arg(short, long)]
        project: bool,
    },
    /// Remove an installed agent version
    Remove {
        spec: String,
        /// Remove every installed version of the agent
        #[arg(long)]
        all: bool,
    },
    /// Select the global default version (agent@version)
    Use {
        spec: String,
        /// Pin in the project manifest instead of globally
        #[arg(short, long)]
        project: bool,
    },
    /// List installed agent versions
    List {
        /// Restrict to one agent
        agent: Option<String>,
    },
    /// Manage central command files
    #[command(subcommand)]
    Commands(commands::resources::CommandsCmd),
    /// Manage central skills
    #[command(subcommand)]
    Skills(commands::resources::SkillsCmd),
    /// Manage central hooks
    #[command(subcommand)]
    Hooks(commands::resources::HooksCmd),
    /// Manage MCP server registrations
    #[command(subcommand)]
    Mcp(commands::mcp::McpCmd),
    /// Manage central memory files
    #[command(subcommand)]
    Memory(commands::resources::MemoryCmd),
    /// Manage context drives (and serve them over MCP)
    #[command(subcommand)]
    Drive(commands::drive::DriveCmd),
    /// Manage scheduled jobs
    #[command(subcommand)]
    Jobs(commands::jobs::JobsCmd),
    /// Control the scheduler daemon
    #[command(subcommand)]
    Daemon(commands::daemon::DaemonCmd),
    /// Manage config repo slots
    #[command(subcommand)]
    Repo(commands::repo::RepoCmd),
    /// Manage package registries
    #[command(subcommand)]
    Registry(commands::registry::RegistryCmd),
    /// Search configured registries
    Search {
        /// mcp or skill
        kind: String,
        query: String,
    },
    /// Install a package from a registry
    Install {
        /// mcp or skill
        kind: String,
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Quiet by default; RUST_LOG opts into tracing output on stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => {}
        Err(err) => {
            if err.code == 0 {
                println!("{err}");
            } else {
                eprintln!("error: {err}");
            }
            std::process::exit(err.code);
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), ExitError> {
    let ctx = Context::new()?;
    match cli.command {
        Command::Status { agent } => commands::status::run(&ctx, agent.as_deref()).await,
        Command::Pull(args) => commands::pull::run(&ctx, args).await,
        Command::Push(args) => commands::push::run(&ctx, args).await,
        Command::Add { spec, project } => commands::versions::add(&ctx, &spec, project).await,
        Command::Remove { spec, all } => commands::versions::remove(&ctx, &spec, all).await,
        Command::Use { spec, project } => commands::versions::use_version(&ctx, &spec, project),
        Command::List { agent } => commands::versions::list(&ctx, agent.as_deref()),
        Command::Commands(cmd) => commands::resources::commands(&ctx, cmd),
        Command::Skills(cmd) => commands::resources::skills(&ctx, cmd),
        Command::Hooks(cmd) => commands::resources::hooks(&ctx, cmd),
        Command::Memory(cmd) => commands::resources::memory(&ctx, cmd),
        Command::Mcp(cmd) => commands::mcp::run(&ctx, cmd).await,
        Command::Drive(cmd) => commands::drive::run(&ctx, cmd).await,
        Command::Jobs(cmd) => commands::jobs::run(&ctx, cmd).await,
        Command::Daemon(cmd) => commands::daemon::run(&ctx, cmd).await,
        Command::Repo(cmd) => commands::repo::run(&ctx, cmd).await,
        Command::Registry(cmd) => commands::registry::run(&ctx, cmd),
        Command::Search { kind, query } => commands::registry::search(&ctx, &kind, &query).await,
        Command::Install { kind, name } => commands::registry::install(&ctx, &kind, &name).await,
    }
}
