// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Schema Validation Domain
//!
//! Uniform interface over two structurally different JSON Schema engines.
//!
//! | Type | Description |
//! |------|-------------|
//! | `ValidationBackend` | Which engine evaluates the candidate |
//! | `ValidationOutcome` | `valid` flag + ordered `{location, message}` issues |
//! | `OutcomeKind` | Output-pane classification of the outcome |
//! | `SchemaValidator` | Capability implemented by each backend |
//!
//! Location and message formats are backend-native and are not required to
//! match across backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validator engine selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationBackend {
    /// Schema compiled into a reusable validator, evaluated synchronously
    #[default]
    CompiledSync,
    /// Schema registered under a synthetic identifier, evaluated asynchronously
    RegistryAsync,
}

impl ValidationBackend {
    pub fn all() -> &'static [ValidationBackend] {
        &[ValidationBackend::CompiledSync, ValidationBackend::RegistryAsync]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationBackend::CompiledSync => "compiled",
            ValidationBackend::RegistryAsync => "registry",
        }
    }
}

impl fmt::Display for ValidationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationBackend {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compiled" | "compiled-sync" | "sync" => Ok(ValidationBackend::CompiledSync),
            "registry" | "registry-async" | "async" => Ok(ValidationBackend::RegistryAsync),
            other => Err(ValidationError::UnknownBackend(other.to_string())),
        }
    }
}

/// A single finding reported by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Instance location (JSON pointer); empty for document-level findings
    pub location: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Classification used by the validation pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Candidate is JSON and satisfies the schema
    Valid,
    /// Candidate is JSON but violates the schema
    SchemaInvalid,
    /// Candidate text is not JSON
    InvalidJson,
    /// Schema text is not JSON or is not a usable schema
    SchemaParseError,
}

/// Result of validating one candidate against one schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub kind: OutcomeKind,
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            kind: OutcomeKind::Valid,
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Empty `errors` still yields an invalid outcome; callers decide validity.
    pub fn schema_invalid(errors: Vec<ValidationIssue>) -> Self {
        Self {
            kind: OutcomeKind::SchemaInvalid,
            valid: false,
            errors,
        }
    }

    pub fn invalid_json(parse_error: impl fmt::Display) -> Self {
        Self {
            kind: OutcomeKind::InvalidJson,
            valid: false,
            errors: vec![ValidationIssue::new(
                "",
                format!("Invalid JSON: {}", parse_error),
            )],
        }
    }

    pub fn schema_parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::SchemaParseError,
            valid: false,
            errors: vec![ValidationIssue::new("", message)],
        }
    }

    /// Text rendered into the validation pane
    pub fn report(&self) -> String {
        match self.kind {
            OutcomeKind::Valid => "✅ Valid JSON that matches the schema".to_string(),
            OutcomeKind::SchemaInvalid => {
                let lines: Vec<String> = self
                    .errors
                    .iter()
                    .map(|issue| format!("{} {}", issue.location, issue.message))
                    .collect();
                format!("❌ Schema validation errors:\n{}", lines.join("\n"))
            }
            OutcomeKind::InvalidJson => format!(
                "❌ {}",
                self.errors
                    .first()
                    .map(|issue| issue.message.as_str())
                    .unwrap_or("Invalid JSON")
            ),
            OutcomeKind::SchemaParseError => self
                .errors
                .first()
                .map(|issue| issue.message.clone())
                .unwrap_or_else(|| "Error parsing schema".to_string()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid schema: {0}")]
    SchemaCompile(String),

    #[error("Schema not registered: {0}")]
    SchemaNotRegistered(String),

    #[error("Validator backend failed: {0}")]
    Backend(String),

    #[error("Unknown validator backend: '{0}'. Expected 'compiled' or 'registry'")]
    UnknownBackend(String),
}

/// Capability implemented by every validator engine
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    fn backend(&self) -> ValidationBackend;

    /// Evaluates `candidate` against `schema`, returning every finding in
    /// engine order. An empty vector means the candidate is valid.
    async fn validate(
        &self,
        schema: &Value,
        candidate: &Value,
    ) -> Result<Vec<ValidationIssue>, ValidationError>;
}
