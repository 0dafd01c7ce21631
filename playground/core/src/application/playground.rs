// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Playground
//!
//! Session orchestration behind the UI surface: owns the editable session
//! state and wires the execute and validate actions to their services.
//!
//! # Request tokens
//!
//! Each execute and each validation takes the next token of its channel.
//! A result is applied only while its token is still the latest issued on
//! that channel; older results are dropped and reported as
//! [`PlaygroundEvent::StaleResultDiscarded`].

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::execution::ExecutionService;
use crate::application::validation_service::ValidationService;
use crate::domain::config::PlaygroundConfigManifest;
use crate::domain::events::{PlaygroundEvent, RequestChannel, RequestToken};
use crate::domain::llm::{ConfigurationIssue, ExecutionError, ExecutionRequest, ExecutionResult};
use crate::domain::provider::Provider;
use crate::domain::session::{Mode, OutputPaneState, SessionError, SessionState};
use crate::domain::validation::{ValidationBackend, ValidationOutcome};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::key_store::{ApiKeyStore, KeyStoreError};

const MISSING_KEY_NOTICE: &str = "Please set your API key in settings first";

#[derive(Default)]
struct TokenSequence {
    issued: AtomicU64,
}

impl TokenSequence {
    fn next(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn latest(&self) -> RequestToken {
        RequestToken(self.issued.load(Ordering::SeqCst))
    }
}

pub struct Playground {
    session: Mutex<SessionState>,
    execution: Arc<ExecutionService>,
    validation: Arc<ValidationService>,
    keys: Arc<ApiKeyStore>,
    backend: Mutex<ValidationBackend>,
    event_bus: EventBus,
    execution_tokens: TokenSequence,
    validation_tokens: TokenSequence,
}

impl Playground {
    pub fn new(
        execution: Arc<ExecutionService>,
        validation: Arc<ValidationService>,
        keys: Arc<ApiKeyStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session: Mutex::new(SessionState::default()),
            execution,
            validation,
            keys,
            backend: Mutex::new(ValidationBackend::default()),
            event_bus,
            execution_tokens: TokenSequence::default(),
            validation_tokens: TokenSequence::default(),
        }
    }

    /// Playground wired from configuration, starting from the configured
    /// provider, model, mode and validator.
    pub fn from_config(config: &PlaygroundConfigManifest) -> Result<Self, SessionError> {
        let keys = match config.key_store_path() {
            Some(path) => ApiKeyStore::open(path),
            None => ApiKeyStore::in_memory(),
        };
        Self::from_config_with_keys(config, keys)
    }

    pub fn from_config_with_keys(
        config: &PlaygroundConfigManifest,
        keys: ApiKeyStore,
    ) -> Result<Self, SessionError> {
        let playground = Self::new(
            Arc::new(ExecutionService::from_config(config)),
            Arc::new(ValidationService::from_config(config)),
            Arc::new(keys),
            EventBus::with_default_capacity(),
        );

        let defaults = &config.spec.defaults;
        playground.set_backend(defaults.validator);
        {
            let mut session = playground.session.lock();
            if defaults.mode != session.mode {
                session.set_mode(defaults.mode);
            }
            session.select_provider(defaults.provider);
            session.select_model(&config.default_model())?;
        }
        Ok(playground)
    }

    /// Snapshot of the current session
    pub fn session(&self) -> SessionState {
        self.session.lock().clone()
    }

    /// Replaces the session, e.g. one restored from a shared query string
    pub fn restore(&self, session: SessionState) {
        *self.session.lock() = session;
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn backend(&self) -> ValidationBackend {
        *self.backend.lock()
    }

    pub fn set_backend(&self, backend: ValidationBackend) {
        *self.backend.lock() = backend;
    }

    pub fn select_provider(&self, provider: Provider) {
        self.session.lock().select_provider(provider);
    }

    pub fn select_model(&self, model: &str) -> Result<(), SessionError> {
        self.session.lock().select_model(model)
    }

    pub fn set_mode(&self, mode: Mode) {
        self.session.lock().set_mode(mode);
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.session.lock().prompt = prompt.into();
    }

    pub fn set_schema(&self, schema: impl Into<String>) {
        self.session.lock().schema = schema.into();
    }

    pub fn close_settings(&self) {
        self.session.lock().settings_open = false;
    }

    /// Key stored for the selected provider
    pub fn api_key(&self) -> String {
        self.keys.load(self.session.lock().provider())
    }

    /// Saves the key for the selected provider and closes the settings dialog
    pub fn save_api_key(&self, key: &str) -> Result<(), KeyStoreError> {
        let provider = self.session.lock().provider();
        let saved = self.keys.save(provider, key);
        self.close_settings();
        saved
    }

    /// Runs the execute action. Returns `Ok(None)` when a newer execution
    /// superseded this one before it completed.
    pub async fn execute(&self) -> Result<Option<ExecutionResult>, ExecutionError> {
        let snapshot = self.session();
        let provider = snapshot.provider();
        let api_key = self.keys.load(provider);

        if provider.requires_api_key() && api_key.is_empty() {
            let mut session = self.session.lock();
            session.validation = MISSING_KEY_NOTICE.to_string();
            session.settings_open = true;
            return Err(ExecutionError::missing_api_key(provider));
        }

        if snapshot.prompt.trim().is_empty() {
            let err = ExecutionError::empty_prompt(provider);
            self.session.lock().validation = err.to_string();
            return Err(err);
        }

        let mut request = ExecutionRequest::new(provider, snapshot.prompt.clone())
            .with_model(snapshot.model())
            .with_api_key(api_key);
        if snapshot.mode == Mode::Structured {
            match serde_json::from_str::<Value>(&snapshot.schema) {
                Ok(schema) => request = request.with_schema(schema),
                Err(e) => {
                    let err = ExecutionError::configuration(
                        provider,
                        ConfigurationIssue::InvalidSchema,
                        format!("Error parsing schema: {}", e),
                    );
                    self.session.lock().validation = format!("Error: {}", err);
                    return Err(err);
                }
            }
        }

        let token = self.execution_tokens.next();
        self.session.lock().validation.clear();
        self.event_bus.publish(PlaygroundEvent::ExecutionStarted {
            token,
            provider,
            model: request.effective_model().to_string(),
            started_at: Utc::now(),
        });

        let result = self.execution.execute(&request).await;

        if !self.is_latest(RequestChannel::Execution, token) {
            return Ok(None);
        }

        match result {
            Ok(result) => {
                self.event_bus.publish(PlaygroundEvent::ExecutionCompleted {
                    token,
                    provider,
                    output_chars: result.output_text.len(),
                    completed_at: Utc::now(),
                });
                self.session.lock().output = pretty_json(&result.output_text);
                if snapshot.mode == Mode::Structured {
                    self.validate_output().await;
                }
                Ok(Some(result))
            }
            Err(err) => {
                self.event_bus.publish(PlaygroundEvent::ExecutionFailed {
                    token,
                    provider,
                    kind: err.kind(),
                    message: err.to_string(),
                    failed_at: Utc::now(),
                });
                self.session.lock().validation = format!("Error: {}", err);
                Err(err)
            }
        }
    }

    /// Replaces the output pane and, in structured mode, re-validates it
    pub async fn edit_output(&self, output: impl Into<String>) -> Option<ValidationOutcome> {
        let mode = {
            let mut session = self.session.lock();
            session.output = output.into();
            session.mode
        };

        match mode {
            Mode::Structured => self.validate_output().await,
            Mode::Normal => None,
        }
    }

    /// Validates the output pane against the schema pane. Returns `None` when
    /// the output is empty or a newer validation superseded this one.
    pub async fn validate_output(&self) -> Option<ValidationOutcome> {
        let (schema, output) = {
            let session = self.session.lock();
            (session.schema.clone(), session.output.clone())
        };
        let token = self.validation_tokens.next();

        if output.trim().is_empty() {
            let mut session = self.session.lock();
            session.validation.clear();
            session.output_state = OutputPaneState::Empty;
            return None;
        }

        let backend = self.backend();
        let outcome = self.validation.validate(&schema, &output, backend).await;

        if !self.is_latest(RequestChannel::Validation, token) {
            return None;
        }

        self.session.lock().apply_outcome(&outcome);
        self.event_bus.publish(PlaygroundEvent::ValidationCompleted {
            token,
            backend,
            kind: outcome.kind,
            error_count: outcome.errors.len(),
            completed_at: Utc::now(),
        });
        Some(outcome)
    }

    fn is_latest(&self, channel: RequestChannel, token: RequestToken) -> bool {
        let latest = match channel {
            RequestChannel::Execution => self.execution_tokens.latest(),
            RequestChannel::Validation => self.validation_tokens.latest(),
        };
        if token == latest {
            return true;
        }

        info!(?channel, %token, %latest, "Discarding stale result");
        self.event_bus.publish(PlaygroundEvent::StaleResultDiscarded {
            channel,
            token,
            latest,
        });
        false
    }
}

/// Re-indents JSON text; anything else is returned unchanged
fn pretty_json(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string()),
        Err(_) => {
            debug!("Output is not JSON, keeping it verbatim");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::ProviderRegistry;
    use std::time::Duration;

    fn playground() -> Playground {
        Playground::new(
            Arc::new(ExecutionService::new(
                Arc::new(ProviderRegistry::new()),
                Duration::from_secs(1),
            )),
            Arc::new(ValidationService::default()),
            Arc::new(ApiKeyStore::in_memory()),
            EventBus::new(16),
        )
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(pretty_json("four"), "four");
    }

    #[test]
    fn test_token_sequence_is_monotonic() {
        let tokens = TokenSequence::default();
        assert_eq!(tokens.latest(), RequestToken(0));
        assert_eq!(tokens.next(), RequestToken(1));
        assert_eq!(tokens.next(), RequestToken(2));
        assert_eq!(tokens.latest(), RequestToken(2));
    }

    #[tokio::test]
    async fn test_missing_key_opens_settings_without_request() {
        let playground = playground();
        let mut events = playground.event_bus().subscribe();

        let err = playground.execute().await.unwrap_err();
        assert!(err.is_missing_api_key());

        let session = playground.session();
        assert!(session.settings_open);
        assert_eq!(session.validation, MISSING_KEY_NOTICE);
        assert!(events.drain().is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_before_network() {
        let playground = playground();
        playground.select_provider(Provider::Ollama);
        playground.set_prompt("  ");

        let err = playground.execute().await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a prompt");
        assert!(!playground.session().settings_open);
    }

    #[tokio::test]
    async fn test_save_api_key_closes_settings() {
        let playground = playground();
        let _ = playground.execute().await;
        assert!(playground.session().settings_open);

        playground.save_api_key("sk-test").unwrap();
        assert!(!playground.session().settings_open);
        assert_eq!(playground.api_key(), "sk-test");
    }

    #[tokio::test]
    async fn test_edit_output_validates_in_structured_mode() {
        let playground = playground();

        let outcome = playground.edit_output("not json").await.unwrap();
        assert!(!outcome.valid);
        let session = playground.session();
        assert_eq!(session.output_state, OutputPaneState::InvalidJson);
        assert!(session.validation.starts_with("❌ Invalid JSON: "));

        let outcome = playground
            .edit_output(r#"{"steps":[],"final_result":"4"}"#)
            .await
            .unwrap();
        assert!(outcome.valid);
        assert_eq!(
            playground.session().validation,
            "✅ Valid JSON that matches the schema"
        );
    }

    #[tokio::test]
    async fn test_normal_mode_never_validates() {
        let playground = playground();
        playground.set_mode(Mode::Normal);

        assert!(playground.edit_output("just prose").await.is_none());
        let session = playground.session();
        assert_eq!(session.output, "just prose");
        assert!(session.validation.is_empty());
        assert_eq!(session.output_state, OutputPaneState::Empty);
    }

    #[tokio::test]
    async fn test_empty_output_resets_pane_state() {
        let playground = playground();
        playground.edit_output("nope").await;
        assert!(playground.edit_output("").await.is_none());
        assert_eq!(playground.session().output_state, OutputPaneState::Empty);
    }

    #[tokio::test]
    async fn test_overlapping_registry_validations_keep_latest() {
        let playground = playground();
        playground.set_backend(ValidationBackend::RegistryAsync);
        let mut events = playground.event_bus().subscribe();

        // First validation takes its token, then yields on the blocking pool
        let mut superseded = tokio_test::task::spawn(playground.edit_output(r#"{"steps": 4}"#));
        let first_poll = superseded.poll();

        let latest = playground
            .edit_output(r#"{"steps":[],"final_result":"4"}"#)
            .await
            .unwrap();
        assert!(latest.valid);

        let first = match first_poll {
            std::task::Poll::Ready(outcome) => outcome,
            std::task::Poll::Pending => superseded.await,
        };
        assert!(first.is_none());

        let session = playground.session();
        assert_eq!(session.output, r#"{"steps":[],"final_result":"4"}"#);
        assert_eq!(session.output_state, OutputPaneState::ValidJsonSchemaValid);
        assert_eq!(session.validation, "✅ Valid JSON that matches the schema");

        let events = events.drain();
        let completed: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                PlaygroundEvent::ValidationCompleted { token, backend, .. } => Some((*token, *backend)),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![(RequestToken(2), ValidationBackend::RegistryAsync)]);
        assert!(events.iter().any(|event| matches!(
            event,
            PlaygroundEvent::StaleResultDiscarded { token: RequestToken(1), latest: RequestToken(2), .. }
        )));
    }

    #[test]
    fn test_stale_token_is_discarded_and_published() {
        let playground = playground();
        let mut events = playground.event_bus().subscribe();

        let first = playground.validation_tokens.next();
        let second = playground.validation_tokens.next();

        assert!(!playground.is_latest(RequestChannel::Validation, first));
        assert!(playground.is_latest(RequestChannel::Validation, second));
        // Channels are independent
        assert!(playground.is_latest(RequestChannel::Execution, RequestToken(0)));

        match events.try_recv().unwrap() {
            PlaygroundEvent::StaleResultDiscarded { token, latest, .. } => {
                assert_eq!(token, first);
                assert_eq!(latest, second);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_applies_defaults() {
        let mut config = PlaygroundConfigManifest::default();
        config.spec.defaults.provider = Provider::Ollama;
        config.spec.defaults.model = Some("mistral".to_string());
        config.spec.defaults.mode = Mode::Normal;
        config.spec.defaults.validator = ValidationBackend::RegistryAsync;
        let dir = tempfile::tempdir().unwrap();
        config.spec.key_store.path = Some(dir.path().join("keys.json"));

        let playground = Playground::from_config(&config).unwrap();
        let session = playground.session();
        assert_eq!(session.provider(), Provider::Ollama);
        assert_eq!(session.model(), "mistral");
        assert_eq!(session.mode, Mode::Normal);
        assert!(session.prompt.is_empty());
        assert_eq!(playground.backend(), ValidationBackend::RegistryAsync);
    }
}
