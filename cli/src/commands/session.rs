// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shareable session commands
//!
//! A session travels as a form-urlencoded query string carrying the prompt,
//! schema and output panes.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use playground_core::domain::session::SessionState;

use super::input::read_text;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Encode panes into a query string
    Encode {
        /// Prompt text (default: the sample prompt)
        #[arg(short, long)]
        prompt: Option<String>,

        /// Schema file (default: the sample schema)
        #[arg(short, long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// Output pane file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decode a query string into its panes
    Decode {
        /// Query string, with or without the leading `?`
        #[arg(value_name = "QUERY")]
        query: String,

        /// Print the decoded session as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Encode {
            prompt,
            schema,
            output,
        } => {
            let session = build_session(prompt, schema, output)?;
            println!("?{}", session.to_query());
        }
        SessionCommand::Decode { query, json } => {
            let session = SessionState::from_query(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                print_pane("Prompt", &session.prompt);
                print_pane("Schema", &session.schema);
                print_pane("Output", &session.output);
            }
        }
    }

    Ok(())
}

fn build_session(
    prompt: Option<String>,
    schema: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<SessionState> {
    let mut session = SessionState::default();
    if let Some(prompt) = prompt {
        session.prompt = prompt;
    }
    if let Some(path) = schema {
        session.schema = read_text(&path)?;
    }
    if let Some(path) = output {
        session.output = read_text(&path)?;
    }
    Ok(session)
}

fn print_pane(label: &str, content: &str) {
    println!("{}", format!("{}:", label).bold());
    if content.is_empty() {
        println!("{}", "(empty)".dimmed());
    } else {
        println!("{}", content);
    }
    println!();
}
