// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `dvo`: undeploy folders, remove repositories and browse deployed
//! projects, resumable from checkpoints.

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{order, remove, show, teardown, tree, Context};
use config::Config;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "dvo", version = env::VERSION, about = "Cloud resource lifecycle orchestrator", styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    format: OutputFormat,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the desktop notification when an operation finishes
    #[arg(long, global = true)]
    no_notify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete every checkpointed resource of the given folders
    Teardown(teardown::TeardownArgs),
    /// Remove one repository from a deployed project
    RemoveRepo(remove::RemoveArgs),
    /// Show checkpoints
    Show(show::ShowArgs),
    /// Show the order a teardown would delete in
    Order(order::OrderArgs),
    /// List a project's resources
    Tree(tree::TreeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let code = match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", color::failed(&exit.message));
                }
                exit.code
            }
            None => {
                eprintln!("{} {:#}", color::failed("error:"), e);
                exit_error::OPERATION_FAILED
            }
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let _guard = logging::init(&config, cli.verbose)?;
    tracing::debug!(state_dir = %config.state_dir.display(), "starting");
    let ctx = Context { config, format: cli.format, notify: !cli.no_notify };

    match cli.command {
        Commands::Teardown(args) => teardown::handle(args, &ctx).await,
        Commands::RemoveRepo(args) => remove::handle(args, &ctx).await,
        Commands::Show(args) => show::handle(args, &ctx),
        Commands::Order(args) => order::handle(args, &ctx),
        Commands::Tree(args) => tree::handle(args, &ctx).await,
    }
}
