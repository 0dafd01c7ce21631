// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Provider Registration Table
//
// Maps each provider to its endpoint, model list and wire adapter.
// New providers are added by registering an entry; the execution service
// never switches on the provider itself.

use crate::domain::config::PlaygroundConfigManifest;
use crate::domain::llm::ProviderAdapter;
use crate::domain::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::ollama::OllamaAdapter;
use super::openai::OpenAIAdapter;

/// Everything needed to talk to one provider
#[derive(Clone)]
pub struct ProviderEntry {
    pub endpoint: String,
    pub models: &'static [&'static str],
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .finish()
    }
}

/// Registration table for LLM providers
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    entries: HashMap<Provider, ProviderEntry>,
}

impl ProviderRegistry {
    /// Empty registry; `register` entries explicitly
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry populated from the built-in catalog
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Provider::OpenAI, Provider::OpenAI.default_endpoint(), Arc::new(OpenAIAdapter::new()));
        registry.register(Provider::Ollama, Provider::Ollama.default_endpoint(), Arc::new(OllamaAdapter::new()));
        registry
    }

    /// Create provider registry from configuration (catalog + endpoint overrides)
    pub fn from_config(config: &PlaygroundConfigManifest) -> Self {
        let mut registry = Self::new();

        for provider in Provider::all() {
            if let Some(endpoint) = config.endpoint_override(*provider) {
                info!("Overriding {} endpoint -> {}", provider, endpoint);
                registry = registry.with_endpoint(*provider, endpoint);
            }
        }

        registry
    }

    pub fn register(
        &mut self,
        provider: Provider,
        endpoint: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) {
        self.entries.insert(
            provider,
            ProviderEntry {
                endpoint: endpoint.into(),
                models: provider.models(),
                adapter,
            },
        );
    }

    /// Replace the endpoint of an already registered provider
    pub fn with_endpoint(mut self, provider: Provider, endpoint: impl Into<String>) -> Self {
        if let Some(entry) = self.entries.get_mut(&provider) {
            entry.endpoint = endpoint.into();
        }
        self
    }

    pub fn entry(&self, provider: Provider) -> Option<&ProviderEntry> {
        self.entries.get(&provider)
    }

    pub fn endpoint_for(&self, provider: Provider) -> Option<&str> {
        self.entry(provider).map(|e| e.endpoint.as_str())
    }

    pub fn models_for(&self, provider: Provider) -> &'static [&'static str] {
        provider.models()
    }

    pub fn adapter_for(&self, provider: Provider) -> Option<Arc<dyn ProviderAdapter>> {
        self.entry(provider).map(|e| e.adapter.clone())
    }

    /// Registered providers in selector order
    pub fn providers(&self) -> Vec<Provider> {
        Provider::all()
            .iter()
            .copied()
            .filter(|p| self.entries.contains_key(p))
            .collect()
    }

    pub fn is_valid_model(&self, provider: Provider, model: &str) -> bool {
        self.entries.contains_key(&provider) && provider.supports_model(model)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_registry() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.providers(), vec![Provider::OpenAI, Provider::Ollama]);
        assert_eq!(
            registry.endpoint_for(Provider::OpenAI),
            Some("https://api.openai.com/v1/chat/completions")
        );
        assert_eq!(
            registry.endpoint_for(Provider::Ollama),
            Some("http://localhost:11434/api/generate")
        );
        for provider in registry.providers() {
            let models = registry.models_for(provider);
            assert!(!models.is_empty());
            assert_eq!(registry.adapter_for(provider).unwrap().provider(), provider);
        }
    }

    #[test]
    fn test_config_overrides_endpoint() {
        let mut config = PlaygroundConfigManifest::default();
        config.set_endpoint(Provider::Ollama, "http://gpu-box:11434/api/generate".to_string());

        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(
            registry.endpoint_for(Provider::Ollama),
            Some("http://gpu-box:11434/api/generate")
        );
        assert_eq!(
            registry.endpoint_for(Provider::OpenAI),
            Some("https://api.openai.com/v1/chat/completions")
        );
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ProviderRegistry::empty();
        assert!(registry.endpoint_for(Provider::OpenAI).is_none());
        assert!(registry.providers().is_empty());
        assert!(!registry.is_valid_model(Provider::OpenAI, "gpt-4o"));
    }
}
