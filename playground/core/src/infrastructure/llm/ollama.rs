// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ollama LLM Provider Adapter
//
// Anti-Corruption Layer for Ollama local models (/api/generate).
// No authentication; the schema is both prepended to the prompt and passed as `format`.

use crate::domain::llm::ProviderAdapter;
use crate::domain::provider::Provider;
use serde_json::{json, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct OllamaAdapter;

impl OllamaAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for OllamaAdapter {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn headers(&self, _api_key: &str) -> Vec<(String, String)> {
        vec![("Content-Type".to_string(), "application/json".to_string())]
    }

    fn build_body(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Value {
        let instruction = match schema {
            Some(schema) => format!("{}\n\n{}", schema, prompt),
            None => prompt.to_string(),
        };

        let mut body = json!({
            "model": model,
            "prompt": instruction,
            "stream": false,
        });

        if let Some(schema) = schema {
            body["format"] = schema.clone();
        }

        body
    }

    fn extract_text(&self, raw: &Value) -> String {
        raw.get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}
