// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider
//!
//! Closed set of LLM providers and the static catalog of their endpoints and models.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Provider identity, default endpoint and model list per provider

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// LLM provider supported by the playground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Bearer-token authenticated chat-completion API
    OpenAI,
    /// Unauthenticated local generation API
    Ollama,
}

const OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4-turbo"];
const OLLAMA_MODELS: &[&str] = &["llama2", "mistral", "codellama"];

impl Provider {
    /// Every provider, in selector order
    pub fn all() -> &'static [Provider] {
        &[Provider::OpenAI, Provider::Ollama]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Ollama => "Ollama",
        }
    }

    /// Default network endpoint the request is POSTed to
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1/chat/completions",
            Provider::Ollama => "http://localhost:11434/api/generate",
        }
    }

    /// Ordered, non-empty list of valid model identifiers
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAI => OPENAI_MODELS,
            Provider::Ollama => OLLAMA_MODELS,
        }
    }

    /// First catalog entry; selected whenever the provider changes
    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models().contains(&model)
    }

    /// Local providers run without credentials
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Provider::OpenAI)
    }

    /// Storage key the provider's API key is persisted under
    pub fn key_storage_name(&self) -> String {
        format!("llm-api-key-{}", self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown provider: '{0}'. Expected one of: OpenAI, Ollama")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "ollama" => Ok(Provider::Ollama),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}
