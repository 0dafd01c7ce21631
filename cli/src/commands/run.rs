// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `playground run` - execute a prompt and report the validation result

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use playground_core::application::Playground;
use playground_core::domain::defaults::{example_prompt, example_prompts};
use playground_core::domain::provider::Provider;
use playground_core::domain::session::{Mode, OutputPaneState};
use playground_core::domain::validation::ValidationBackend;

use super::input::{execution_key_store, load_config, read_text};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Prompt text
    #[arg(short, long, conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Read the prompt from a file (`-` for stdin)
    #[arg(long, value_name = "FILE", conflicts_with = "example")]
    pub prompt_file: Option<PathBuf>,

    /// Use the Nth built-in example prompt for the selected mode
    #[arg(long, value_name = "N", conflicts_with = "prompt")]
    pub example: Option<usize>,

    /// JSON Schema file constraining the output (structured mode)
    #[arg(short, long, value_name = "FILE", conflicts_with = "normal")]
    pub schema: Option<PathBuf>,

    /// Normal mode: free-text output, no schema, no validation
    #[arg(long)]
    pub normal: bool,

    /// Provider (openai, ollama)
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Model (must belong to the provider)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Validator backend (compiled, registry)
    #[arg(long)]
    pub validator: Option<ValidationBackend>,

    /// Print the session as JSON instead of formatted panes
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let keys = execution_key_store(&config);
    let playground = Playground::from_config_with_keys(&config, keys)
        .context("Invalid session defaults in configuration")?;

    if args.normal {
        playground.set_mode(Mode::Normal);
    }
    if let Some(provider) = args.provider {
        playground.select_provider(provider);
    }
    if let Some(model) = &args.model {
        playground.select_model(model)?;
    }
    if let Some(backend) = args.validator {
        playground.set_backend(backend);
    }
    if let Some(prompt) = args.prompt {
        playground.set_prompt(prompt);
    } else if let Some(path) = &args.prompt_file {
        playground.set_prompt(read_text(path)?.trim_end().to_string());
    } else if let Some(number) = args.example {
        let mode = playground.session().mode;
        match example_prompt(mode, number) {
            Some(prompt) => playground.set_prompt(prompt),
            None => bail!(
                "No example {} for {} mode. Available:\n{}",
                number,
                mode,
                numbered(example_prompts(mode))
            ),
        }
    }
    if let Some(path) = &args.schema {
        playground.set_schema(read_text(path)?);
    }

    let session = playground.session();
    info!(
        provider = %session.provider(),
        model = session.model(),
        mode = %session.mode,
        "Executing prompt"
    );

    if let Err(e) = playground.execute().await {
        eprintln!("{}", format!("✗ {}", e).red());
        if e.is_missing_api_key() {
            eprintln!(
                "Run 'playground key set {}' or set {}.",
                session.provider().as_str().to_lowercase(),
                super::input::OPENAI_KEY_ENV
            );
        }
        std::process::exit(1);
    }

    let session = playground.session();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!("{}", "Output:".bold());
    println!("{}", session.output);

    if session.mode == Mode::Structured {
        println!();
        println!("{}", format!("Validation ({}):", playground.backend()).bold());
        match session.output_state {
            OutputPaneState::ValidJsonSchemaValid => println!("{}", session.validation.green()),
            OutputPaneState::Empty => println!("{}", "(no output)".dimmed()),
            _ => println!("{}", session.validation.red()),
        }
    }

    Ok(())
}

fn numbered(prompts: &[&str]) -> String {
    prompts
        .iter()
        .enumerate()
        .map(|(i, prompt)| format!("  {}. {}", i + 1, prompt))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_examples_are_one_based() {
        let listing = numbered(example_prompts(Mode::Normal));
        assert!(listing.starts_with("  1. Explain how promises work"));
        assert_eq!(listing.lines().count(), 3);
    }
}
