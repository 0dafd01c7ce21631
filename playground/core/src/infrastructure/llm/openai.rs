// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI LLM Provider Adapter
//
// Anti-Corruption Layer for the OpenAI chat-completions API.
// Also works with OpenAI-compatible APIs (LM Studio, vLLM, etc.) via endpoint override.

use crate::domain::llm::ProviderAdapter;
use crate::domain::provider::Provider;
use serde_json::{json, Value};

/// Name attached to the structured-output directive
const SCHEMA_NAME: &str = "process_steps";

#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAIAdapter;

impl OpenAIAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", api_key)),
        ]
    }

    fn build_body(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = json!({
            "model": model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        if let Some(schema) = schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": schema,
                }
            });
        }

        body
    }

    fn extract_text(&self, raw: &Value) -> String {
        raw.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_carry_bearer_token() {
        let headers = OpenAIAdapter::new().headers("sk-test");
        assert!(headers.contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
    }

    #[test]
    fn test_body_without_schema_is_plain_chat() {
        let body = OpenAIAdapter::new().build_body("gpt-4o-mini", "what is 2 + 2", None);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "what is 2 + 2");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_body_with_schema_sets_strict_directive() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let body = OpenAIAdapter::new().build_body("gpt-4o", "hi", Some(&schema));
        let format = &body["response_format"];
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "process_steps");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["schema"], schema);
    }

    #[test]
    fn test_extract_text() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}]
        });
        assert_eq!(OpenAIAdapter::new().extract_text(&raw), "4");
    }

    #[test]
    fn test_extract_text_degrades_to_empty() {
        let adapter = OpenAIAdapter::new();
        assert_eq!(adapter.extract_text(&json!({})), "");
        assert_eq!(adapter.extract_text(&json!({"choices": []})), "");
        assert_eq!(adapter.extract_text(&json!({"choices": [{"message": {"content": null}}]})), "");
        assert_eq!(adapter.extract_text(&json!([1, 2, 3])), "");
    }
}
