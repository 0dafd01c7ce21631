// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `playground validate` - validate a JSON document against a schema

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use playground_core::application::ValidationService;
use playground_core::domain::defaults::DEFAULT_JSON_SCHEMA;
use playground_core::domain::validation::{OutcomeKind, ValidationBackend, ValidationOutcome};

use super::input::{load_config, read_text};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate (`-` for stdin)
    #[arg(value_name = "CANDIDATE")]
    pub candidate: PathBuf,

    /// JSON Schema file (default: the built-in process-steps schema)
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Validator backend (compiled, registry); defaults to the configured one
    #[arg(long)]
    pub validator: Option<ValidationBackend>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ValidateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = args.validator.unwrap_or(config.spec.defaults.validator);

    let schema = match &args.schema {
        Some(path) => read_text(path)?,
        None => DEFAULT_JSON_SCHEMA.to_string(),
    };
    let candidate = read_text(&args.candidate)?;

    let service = ValidationService::from_config(&config);
    let outcome = service.validate(&schema, &candidate, backend).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render(&outcome));
    }

    if !outcome.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn render(outcome: &ValidationOutcome) -> String {
    let report = outcome.report();
    match outcome.kind {
        OutcomeKind::Valid => report.green().to_string(),
        OutcomeKind::SchemaParseError => report.yellow().to_string(),
        OutcomeKind::SchemaInvalid | OutcomeKind::InvalidJson => report.red().to_string(),
    }
}
