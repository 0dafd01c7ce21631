// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use playground_core::domain::config::PlaygroundConfigManifest;
use playground_core::domain::provider::Provider;
use playground_core::infrastructure::llm::ProviderRegistry;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./playground-config.yaml)
        #[arg(short, long, default_value = "./playground-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = PlaygroundConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. PLAYGROUND_CONFIG_PATH: {}",
            std::env::var("PLAYGROUND_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./playground-config.yaml");
        println!("  4. ~/.schema-playground/config.yaml");
        println!("  5. /etc/schema-playground/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Providers:".bold());
    let registry = ProviderRegistry::from_config(&config);
    for provider in Provider::all() {
        let endpoint = registry.endpoint_for(*provider).unwrap_or("(unregistered)");
        let marker = if config.endpoint_override(*provider).is_some() {
            " (override)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}: {}{}", provider.as_str().bold(), endpoint, marker);
    }
    println!();

    let defaults = &config.spec.defaults;
    println!("{}", "Session defaults:".bold());
    println!("  Provider: {}", defaults.provider);
    println!("  Model: {}", config.default_model());
    println!("  Mode: {}", defaults.mode);
    println!("  Validator: {}", defaults.validator);
    println!();

    println!("{}", "Runtime:".bold());
    println!("  HTTP timeout: {}s", config.spec.http.timeout_secs);
    println!(
        "  Validator cache: {} schemas",
        config.spec.validation.cache_capacity
    );
    match config.key_store_path() {
        Some(path) => println!("  Key store: {}", path.display()),
        None => println!("  Key store: {}", "(in memory)".dimmed()),
    }
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = PlaygroundConfigManifest::load_or_default(config_path)
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());
    println!("  Name: {}", config.metadata.name);

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = template(with_examples);

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn template(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid_configs() {
        for with_examples in [false, true] {
            let config = PlaygroundConfigManifest::from_yaml_str(template(with_examples)).unwrap();
            config.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_generate_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("playground-config.yaml");

        generate(output.clone(), false).await.unwrap();

        let config = PlaygroundConfigManifest::from_yaml_file(&output).unwrap();
        assert_eq!(config.metadata.name, "schema-playground");
    }
}
