// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Schema Playground CLI
//!
//! The `playground` binary sends prompts to an LLM provider and validates the
//! returned text against a JSON Schema.
//!
//! ## Commands
//!
//! - `playground run` - Execute a prompt (structured or normal mode)
//! - `playground validate` - Validate a JSON document against a schema
//! - `playground providers` - List providers, endpoints and models
//! - `playground key set|clear|show` - Manage stored API keys
//! - `playground session encode|decode` - Shareable session query strings
//! - `playground config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use schema_playground::commands::{
    self, ConfigCommand, KeyCommand, RunArgs, SessionCommand, ValidateArgs,
};

/// Schema Playground - structured output testing for LLM providers
#[derive(Parser)]
#[command(name = "playground")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PLAYGROUND_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PLAYGROUND_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to the selected provider
    #[command(name = "run")]
    Run(RunArgs),

    /// Validate a JSON document against a schema
    #[command(name = "validate")]
    Validate(ValidateArgs),

    /// List providers and their models
    #[command(name = "providers")]
    Providers,

    /// Manage stored API keys
    #[command(name = "key")]
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// Encode or decode shareable sessions
    #[command(name = "session")]
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(args, cli.config).await,
        Some(Commands::Validate(args)) => commands::validate::execute(args, cli.config).await,
        Some(Commands::Providers) => commands::providers::execute(cli.config).await,
        Some(Commands::Key { command }) => commands::key::handle_command(command, cli.config).await,
        Some(Commands::Session { command }) => {
            commands::session::handle_command(command).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging. Logs go to stderr so command
/// output on stdout stays pipeable.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
