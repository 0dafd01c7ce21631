// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! API key management commands
//!
//! Commands: set, clear, show

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::io::BufRead;
use std::path::PathBuf;

use playground_core::domain::provider::Provider;
use playground_core::infrastructure::key_store::mask_key;

use super::input::{load_config, open_key_store};

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Store the API key for a provider
    Set {
        /// Provider (openai, ollama)
        provider: Provider,

        /// Key value; read from stdin when omitted
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },

    /// Remove the stored API key for a provider
    Clear {
        provider: Provider,
    },

    /// Show the stored API key (masked)
    Show {
        provider: Provider,
    },
}

pub async fn handle_command(command: KeyCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_key_store(&config);

    match command {
        KeyCommand::Set { provider, key } => {
            let key = match key {
                Some(key) => key,
                None => read_key_line()?,
            };
            let key = key.trim();
            if !provider.requires_api_key() {
                println!(
                    "{}",
                    format!("⚠ {} does not use an API key; storing it anyway", provider).yellow()
                );
            }
            store
                .save(provider, key)
                .with_context(|| format!("Failed to store {} API key", provider))?;
            if key.is_empty() {
                println!("{}", format!("✓ {} API key removed", provider).green());
            } else {
                println!("{}", format!("✓ {} API key saved", provider).green());
                if let Some(path) = store.path() {
                    println!("  Stored in {}", path.display().to_string().dimmed());
                }
            }
        }
        KeyCommand::Clear { provider } => {
            store
                .clear(provider)
                .with_context(|| format!("Failed to clear {} API key", provider))?;
            println!("{}", format!("✓ {} API key cleared", provider).green());
        }
        KeyCommand::Show { provider } => {
            let key = store.load(provider);
            if key.is_empty() {
                println!("{}: {}", provider, "(not set)".dimmed());
            } else {
                println!("{}: {}", provider, mask_key(&key));
            }
        }
    }

    Ok(())
}

fn read_key_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read API key from stdin")?;
    Ok(line)
}
