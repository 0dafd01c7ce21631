// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `playground providers` - list registered providers

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use playground_core::infrastructure::llm::ProviderRegistry;

use super::input::{load_config, open_key_store};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = ProviderRegistry::from_config(&config);
    let keys = open_key_store(&config);

    for provider in registry.providers() {
        let endpoint = registry.endpoint_for(provider).unwrap_or("(unregistered)");
        println!("{}", provider.as_str().bold());
        println!("  Endpoint: {}", endpoint);

        if provider.requires_api_key() {
            let status = if keys.load(provider).is_empty() {
                "not set".yellow()
            } else {
                "stored".green()
            };
            println!("  API key: {}", status);
        } else {
            println!("  API key: {}", "not required".dimmed());
        }

        println!("  Models:");
        for model in registry.models_for(provider) {
            if *model == provider.default_model() {
                println!("    - {} {}", model, "(default)".dimmed());
            } else {
                println!("    - {}", model);
            }
        }
        println!();
    }

    Ok(())
}
