// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Session Domain
//!
//! Editable state of one playground session: mode, provider/model selection,
//! the four text panes and the settings-dialog flag.
//!
//! ## Invariants
//!
//! - `model ∈ provider.models()` at all times; selecting a provider resets the
//!   model to that provider's default.
//! - Normal mode never validates output.
//!
//! A session can be shared as a form-urlencoded query string carrying the
//! prompt, schema and output panes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::defaults::{DEFAULT_JSON_SCHEMA, DEFAULT_PROMPT};
use super::provider::Provider;
use super::validation::{OutcomeKind, ValidationOutcome};

/// Whether the prompt is sent with a schema constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free-text output, no schema, no validation
    Normal,
    #[default]
    Structured,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Normal => f.write_str("normal"),
            Mode::Structured => f.write_str("structured"),
        }
    }
}

impl FromStr for Mode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "structured" => Ok(Mode::Structured),
            other => Err(SessionError::UnknownMode(other.to_string())),
        }
    }
}

/// State of the output pane after the latest edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPaneState {
    Empty,
    ValidJsonSchemaValid,
    ValidJsonSchemaInvalid,
    InvalidJson,
    SchemaParseError,
}

impl OutputPaneState {
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        match outcome.kind {
            OutcomeKind::Valid => OutputPaneState::ValidJsonSchemaValid,
            OutcomeKind::SchemaInvalid => OutputPaneState::ValidJsonSchemaInvalid,
            OutcomeKind::InvalidJson => OutputPaneState::InvalidJson,
            OutcomeKind::SchemaParseError => OutputPaneState::SchemaParseError,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Model '{model}' is not available for {provider}. Available: {available}")]
    UnknownModel {
        provider: Provider,
        model: String,
        available: String,
    },

    #[error("Unknown mode: '{0}'. Expected 'normal' or 'structured'")]
    UnknownMode(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    provider: Provider,
    model: String,
    pub prompt: String,
    pub schema: String,
    pub output: String,
    pub validation: String,
    pub output_state: OutputPaneState,
    pub settings_open: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: Mode::Structured,
            provider: Provider::OpenAI,
            model: Provider::OpenAI.default_model().to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            schema: DEFAULT_JSON_SCHEMA.to_string(),
            output: String::new(),
            validation: String::new(),
            output_state: OutputPaneState::Empty,
            settings_open: false,
        }
    }
}

impl SessionState {
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Switches provider and resets the model to the provider default
    pub fn select_provider(&mut self, provider: Provider) {
        self.provider = provider;
        self.model = provider.default_model().to_string();
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), SessionError> {
        if !self.provider.supports_model(model) {
            return Err(SessionError::UnknownModel {
                provider: self.provider,
                model: model.to_string(),
                available: self.provider.models().join(", "),
            });
        }
        self.model = model.to_string();
        Ok(())
    }

    /// Clears output and validation and resets the prompt (and, in
    /// structured mode, the schema) to their defaults.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.output.clear();
        self.validation.clear();
        self.output_state = OutputPaneState::Empty;
        match mode {
            Mode::Structured => {
                self.prompt = DEFAULT_PROMPT.to_string();
                self.schema = DEFAULT_JSON_SCHEMA.to_string();
            }
            Mode::Normal => self.prompt.clear(),
        }
    }

    pub fn apply_outcome(&mut self, outcome: &ValidationOutcome) {
        self.validation = outcome.report();
        self.output_state = OutputPaneState::from_outcome(outcome);
    }

    /// Encodes the shareable panes as `application/x-www-form-urlencoded`
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if !self.prompt.is_empty() {
            serializer.append_pair("prompt", &self.prompt);
        }
        if !self.schema.is_empty() {
            serializer.append_pair("schema", &self.schema);
        }
        if !self.output.is_empty() {
            serializer.append_pair("output", &self.output);
        }
        serializer.finish()
    }

    /// Restores a session from a query string. Absent or empty parameters fall
    /// back to the built-in sample prompt and schema. A leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "prompt" => state.prompt = value.into_owned(),
                "schema" => state.schema = value.into_owned(),
                "output" => state.output = value.into_owned(),
                _ => {}
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_provider_resets_model() {
        let mut session = SessionState::default();
        for provider in Provider::all() {
            session.select_provider(*provider);
            assert!(provider.models().contains(&session.model()));
            assert_eq!(session.model(), provider.default_model());
        }
    }

    #[test]
    fn test_select_model_rejects_foreign_model() {
        let mut session = SessionState::default();
        assert!(session.select_model("gpt-4o").is_ok());
        assert_eq!(session.model(), "gpt-4o");

        let err = session.select_model("llama2").unwrap_err();
        assert!(matches!(err, SessionError::UnknownModel { .. }));
        assert_eq!(session.model(), "gpt-4o");
    }

    #[test]
    fn test_mode_switch_resets_panes() {
        let mut session = SessionState::default();
        session.output = "{}".to_string();
        session.validation = "ok".to_string();

        session.set_mode(Mode::Normal);
        assert!(session.prompt.is_empty());
        assert!(session.output.is_empty());
        assert!(session.validation.is_empty());

        session.schema = "{}".to_string();
        session.set_mode(Mode::Structured);
        assert_eq!(session.prompt, DEFAULT_PROMPT);
        assert_eq!(session.schema, DEFAULT_JSON_SCHEMA);
    }

    #[test]
    fn test_query_roundtrip() {
        let mut session = SessionState::default();
        session.prompt = "list 3 colors & their hex codes".to_string();
        session.schema = r#"{"type":"array"}"#.to_string();
        session.output = r#"["red"]"#.to_string();

        let restored = SessionState::from_query(&format!("?{}", session.to_query()));
        assert_eq!(restored.prompt, session.prompt);
        assert_eq!(restored.schema, session.schema);
        assert_eq!(restored.output, session.output);
    }

    #[test]
    fn test_query_missing_params_use_defaults() {
        let restored = SessionState::from_query("prompt=&unrelated=1");
        assert_eq!(restored.prompt, DEFAULT_PROMPT);
        assert_eq!(restored.schema, DEFAULT_JSON_SCHEMA);
        assert!(restored.output.is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Normal".parse::<Mode>().unwrap(), Mode::Normal);
        assert!("json".parse::<Mode>().is_err());
    }
}
