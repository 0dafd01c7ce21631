// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provides llm functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements llm

// LLM Provider Domain Interface (Anti-Corruption Layer)
//
// Request/response shapes differ per provider (chat-completion vs local generation).
// Adapters in infrastructure/llm/ translate between them and the types below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::provider::Provider;

/// Input of a single execute action. Built fresh per execution, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub provider: Provider,

    /// Model identifier; empty selects the provider default
    #[serde(default)]
    pub model: String,

    pub prompt: String,

    /// Empty for local providers
    #[serde(default)]
    pub api_key: String,

    /// Parsed JSON Schema constraining the output (structured mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ExecutionRequest {
    pub fn new(provider: Provider, prompt: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            prompt: prompt.into(),
            api_key: String::new(),
            schema: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Model actually sent on the wire
    pub fn effective_model(&self) -> &str {
        if self.model.trim().is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }
}

/// Normalized output of a successful execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Text extracted from the provider payload (may be empty)
    pub output_text: String,

    /// Untouched provider response body
    pub raw_response: Value,
}

/// Provider-specific HTTP request parts
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ProviderRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Translates between the playground's call contract and one provider's wire format
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Authentication and content-type headers
    fn headers(&self, api_key: &str) -> Vec<(String, String)>;

    /// Request payload. `schema` present means structured output is requested.
    fn build_body(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Value;

    /// Output text from a parsed response. Never fails: missing paths yield "".
    fn extract_text(&self, raw: &Value) -> String;

    fn build_request(&self, request: &ExecutionRequest) -> ProviderRequest {
        ProviderRequest {
            headers: self.headers(&request.api_key),
            body: self.build_body(
                request.effective_model(),
                &request.prompt,
                request.schema.as_ref(),
            ),
        }
    }
}

/// Classification of an execution failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionErrorKind {
    Configuration,
    ProviderUnavailable,
    ProviderRejected,
    MalformedResponse,
}

/// What was wrong with the request before anything was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigurationIssue {
    MissingApiKey,
    EmptyPrompt,
    InvalidSchema,
    UnregisteredProvider,
    InvalidHeader,
}

/// Errors that can occur while executing a prompt against a provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    #[error("{message}")]
    Configuration {
        provider: Provider,
        issue: ConfigurationIssue,
        message: String,
    },

    #[error("{provider} service error: {message}")]
    ProviderUnavailable { provider: Provider, message: String },

    #[error("{provider} API error ({status}): {message}")]
    ProviderRejected {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} service error: Failed to parse {provider} response: {message}")]
    MalformedResponse { provider: Provider, message: String },
}

impl ExecutionError {
    pub fn missing_api_key(provider: Provider) -> Self {
        Self::Configuration {
            provider,
            issue: ConfigurationIssue::MissingApiKey,
            message: format!("{} API key is required", provider),
        }
    }

    pub fn empty_prompt(provider: Provider) -> Self {
        Self::Configuration {
            provider,
            issue: ConfigurationIssue::EmptyPrompt,
            message: "Please enter a prompt".to_string(),
        }
    }

    pub fn configuration(provider: Provider, issue: ConfigurationIssue, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            issue,
            message: message.into(),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Configuration { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::ProviderRejected { provider, .. }
            | Self::MalformedResponse { provider, .. } => *provider,
        }
    }

    pub fn kind(&self) -> ExecutionErrorKind {
        match self {
            Self::Configuration { .. } => ExecutionErrorKind::Configuration,
            Self::ProviderUnavailable { .. } => ExecutionErrorKind::ProviderUnavailable,
            Self::ProviderRejected { .. } => ExecutionErrorKind::ProviderRejected,
            Self::MalformedResponse { .. } => ExecutionErrorKind::MalformedResponse,
        }
    }

    pub fn configuration_issue(&self) -> Option<ConfigurationIssue> {
        match self {
            Self::Configuration { issue, .. } => Some(*issue),
            _ => None,
        }
    }

    /// True for the configuration error that should open the settings dialog
    pub fn is_missing_api_key(&self) -> bool {
        self.configuration_issue() == Some(ConfigurationIssue::MissingApiKey)
    }
}
