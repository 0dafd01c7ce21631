// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Execution Service
//!
//! Sends one prompt to one provider and normalizes the outcome.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Pre-flight checks, HTTP transport and failure classification
//!
//! The provider-specific parts (headers, body, text extraction) come from the
//! adapter registered for the provider in [`ProviderRegistry`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::domain::config::PlaygroundConfigManifest;
use crate::domain::llm::{ConfigurationIssue, ExecutionError, ExecutionRequest, ExecutionResult, ProviderRequest};
use crate::domain::provider::Provider;
use crate::infrastructure::llm::ProviderRegistry;

const REQUESTS_TOTAL: &str = "playground_llm_requests_total";
const REQUEST_DURATION: &str = "playground_llm_request_duration_seconds";

pub struct ExecutionService {
    client: reqwest::Client,
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
}

impl ExecutionService {
    pub fn new(registry: Arc<ProviderRegistry>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            registry,
            timeout,
        }
    }

    pub fn from_config(config: &PlaygroundConfigManifest) -> Self {
        Self::new(
            Arc::new(ProviderRegistry::from_config(config)),
            Duration::from_secs(config.spec.http.timeout_secs),
        )
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Checks that need no network: prompt present and, where required, an API key.
    pub fn preflight(&self, request: &ExecutionRequest) -> Result<(), ExecutionError> {
        if request.provider.requires_api_key() && request.api_key.is_empty() {
            return Err(ExecutionError::missing_api_key(request.provider));
        }
        if request.prompt.trim().is_empty() {
            return Err(ExecutionError::empty_prompt(request.provider));
        }
        Ok(())
    }

    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionError> {
        self.preflight(request)?;

        let provider = request.provider;
        let started = Instant::now();
        let result = self.send(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(ExecutionError::Configuration { .. }) => "configuration",
            Err(ExecutionError::ProviderUnavailable { .. }) => "unavailable",
            Err(ExecutionError::ProviderRejected { .. }) => "rejected",
            Err(ExecutionError::MalformedResponse { .. }) => "malformed",
        };
        metrics::counter!(REQUESTS_TOTAL, "provider" => provider.as_str(), "outcome" => outcome)
            .increment(1);
        metrics::histogram!(REQUEST_DURATION, "provider" => provider.as_str())
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(res) => info!(
                provider = %provider,
                latency_ms = started.elapsed().as_millis() as u64,
                output_chars = res.output_text.len(),
                "LLM request completed"
            ),
            Err(e) => warn!(provider = %provider, kind = ?e.kind(), "LLM request failed: {}", e),
        }

        result
    }

    async fn send(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionError> {
        let provider = request.provider;
        let entry = self
            .registry
            .entry(provider)
            .ok_or_else(|| {
                ExecutionError::configuration(
                    provider,
                    ConfigurationIssue::UnregisteredProvider,
                    format!("{} is not a registered provider", provider),
                )
            })?;

        let mut request = request.clone();
        let model = request.effective_model();
        if !entry.models.iter().any(|m| *m == model) {
            warn!(
                "Model '{}' is not offered by {}, using {}",
                request.model,
                provider,
                provider.default_model()
            );
            request.model = provider.default_model().to_string();
        }

        let wire = entry.adapter.build_request(&request);
        info!(
            provider = %provider,
            model = request.effective_model(),
            structured = request.schema.is_some(),
            "Making request to {}", provider
        );
        debug!("Request body: {}", wire.body);

        let http = self.prepare(provider, &entry.endpoint, &wire)?;

        let response = http.send().await.map_err(|e| self.transport_error(provider, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(provider, e))?;

        if !status.is_success() {
            return Err(ExecutionError::ProviderRejected {
                provider,
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| ExecutionError::MalformedResponse {
            provider,
            message: e.to_string(),
        })?;

        Ok(ExecutionResult {
            output_text: entry.adapter.extract_text(&raw),
            raw_response: raw,
        })
    }

    /// Adapter headers go in first so the JSON body does not add a second
    /// content type. The bearer token is marked sensitive.
    fn prepare(
        &self,
        provider: Provider,
        endpoint: &str,
        wire: &ProviderRequest,
    ) -> Result<reqwest::RequestBuilder, ExecutionError> {
        let headers = header_map(provider, &wire.headers)?;
        Ok(self.client.post(endpoint).headers(headers).json(&wire.body))
    }

    fn transport_error(&self, provider: Provider, e: reqwest::Error) -> ExecutionError {
        let message = if e.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("could not connect to {} ({})", provider, e)
        } else {
            e.to_string()
        };
        ExecutionError::ProviderUnavailable { provider, message }
    }
}

fn header_map(provider: Provider, headers: &[(String, String)]) -> Result<HeaderMap, ExecutionError> {
    let invalid = |name: &str| {
        ExecutionError::configuration(
            provider,
            ConfigurationIssue::InvalidHeader,
            format!("Invalid value for header {}", name),
        )
    };

    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let key = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid(name))?;
        let mut value = HeaderValue::from_str(value).map_err(|_| invalid(name))?;
        if key == AUTHORIZATION {
            value.set_sensitive(true);
        }
        map.insert(key, value);
    }
    Ok(map)
}

/// Provider error text: `error.message`, then a string `error`, then the
/// canonical reason phrase, then the bare status code.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| v.get("error").and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    });

    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::ProviderAdapter;
    use crate::infrastructure::llm::OpenAIAdapter;
    use reqwest::header::CONTENT_TYPE;

    fn service() -> ExecutionService {
        ExecutionService::new(Arc::new(ProviderRegistry::new()), Duration::from_secs(5))
    }

    #[test]
    fn test_rejection_message_prefers_openai_shape() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            rejection_message(StatusCode::UNAUTHORIZED, body),
            "Incorrect API key provided"
        );
    }

    #[test]
    fn test_rejection_message_accepts_ollama_shape() {
        let body = r#"{"error":"model 'llama9' not found"}"#;
        assert_eq!(
            rejection_message(StatusCode::NOT_FOUND, body),
            "model 'llama9' not found"
        );
    }

    #[test]
    fn test_rejection_message_falls_back_to_reason_then_code() {
        assert_eq!(
            rejection_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
        let unknown = StatusCode::from_u16(599).unwrap();
        assert_eq!(rejection_message(unknown, ""), "599");
    }

    #[test]
    fn test_preflight_requires_key_only_where_needed() {
        let service = service();

        let err = service
            .preflight(&ExecutionRequest::new(Provider::OpenAI, "hi"))
            .unwrap_err();
        assert!(err.is_missing_api_key());

        assert!(service
            .preflight(&ExecutionRequest::new(Provider::Ollama, "hi"))
            .is_ok());
    }

    #[test]
    fn test_preflight_rejects_blank_prompt() {
        let err = service()
            .preflight(&ExecutionRequest::new(Provider::Ollama, "   \n"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a prompt");
    }

    #[test]
    fn test_prepared_request_has_one_content_type_and_hidden_token() {
        let service = service();
        let request = ExecutionRequest::new(Provider::OpenAI, "hi").with_api_key("sk-secret");
        let wire = OpenAIAdapter::new().build_request(&request);

        let built = service
            .prepare(Provider::OpenAI, "http://localhost/v1/chat/completions", &wire)
            .unwrap()
            .build()
            .unwrap();

        let content_types: Vec<_> = built.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(content_types, vec!["application/json"]);

        let auth = &built.headers()[AUTHORIZATION];
        assert!(auth.is_sensitive());
        assert_eq!(auth, "Bearer sk-secret");
        assert!(!format!("{:?}", built.headers()).contains("sk-secret"));
    }

    #[test]
    fn test_header_with_newline_is_a_configuration_error() {
        let headers = vec![("Authorization".to_string(), "Bearer sk\nx".to_string())];
        let err = header_map(Provider::OpenAI, &headers).unwrap_err();
        assert_eq!(err.configuration_issue(), Some(ConfigurationIssue::InvalidHeader));
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_a_configuration_error() {
        let service = ExecutionService::new(Arc::new(ProviderRegistry::empty()), Duration::from_secs(1));
        let err = service
            .execute(&ExecutionRequest::new(Provider::Ollama, "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::llm::ExecutionErrorKind::Configuration);
        assert_eq!(err.configuration_issue(), Some(ConfigurationIssue::UnregisteredProvider));
    }
}
