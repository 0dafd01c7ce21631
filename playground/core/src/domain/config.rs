// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Playground Configuration Types
//
// Defines the configuration manifest for the playground, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Provider endpoint overrides
// - Session defaults (provider, model, mode, validator backend)
// - HTTP, validation cache and key store settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::provider::Provider;
use super::session::Mode;
use super::validation::ValidationBackend;

pub const API_VERSION: &str = "schema-playground/v1";
pub const KIND: &str = "PlaygroundConfig";

/// Top-level Kubernetes-style configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaygroundConfigManifest {
    /// API version (must be "schema-playground/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "PlaygroundConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: PlaygroundConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfigSpec {
    /// Per-provider overrides; providers not listed use the built-in catalog
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub defaults: SessionDefaults,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub key_store: KeyStoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,

    /// Replaces the catalog endpoint (e.g. a remote Ollama host or a proxy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_provider")]
    pub provider: Provider,

    /// Must belong to the default provider; provider default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub validator: ValidationBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout for provider calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Compiled validators kept in the LRU cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyStoreConfig {
    /// Defaults to ~/.schema-playground/keys.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_provider() -> Provider {
    Provider::OpenAI
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_cache_capacity() -> usize {
    64
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            mode: Mode::Structured,
            validator: ValidationBackend::CompiledSync,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for PlaygroundConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "schema-playground".to_string(),
                labels: None,
            },
            spec: PlaygroundConfigSpec::default(),
        }
    }
}

impl PlaygroundConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. PLAYGROUND_CONFIG_PATH environment variable
    /// 2. ./playground-config.yaml (working directory)
    /// 3. ~/.schema-playground/config.yaml (user home)
    /// 4. /etc/schema-playground/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PLAYGROUND_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./playground-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".schema-playground").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/schema-playground/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default.
    /// The result is validated after environment overrides are applied.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails if missing/invalid
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?
        } else if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PLAYGROUND_VALIDATOR") {
            match val.parse::<ValidationBackend>() {
                Ok(backend) => {
                    tracing::info!("Environment override: PLAYGROUND_VALIDATOR={}", backend);
                    self.spec.defaults.validator = backend;
                }
                Err(e) => tracing::warn!("Ignoring PLAYGROUND_VALIDATOR: {}", e),
            }
        }

        if let Ok(endpoint) = std::env::var("PLAYGROUND_OPENAI_ENDPOINT") {
            tracing::info!("Environment override: PLAYGROUND_OPENAI_ENDPOINT={}", endpoint);
            self.set_endpoint(Provider::OpenAI, endpoint);
        }

        if let Ok(endpoint) = std::env::var("PLAYGROUND_OLLAMA_ENDPOINT") {
            tracing::info!("Environment override: PLAYGROUND_OLLAMA_ENDPOINT={}", endpoint);
            self.set_endpoint(Provider::Ollama, endpoint);
        }

        if let Ok(val) = std::env::var("PLAYGROUND_HTTP_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => self.spec.http.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    "Invalid value for PLAYGROUND_HTTP_TIMEOUT_SECS: '{}'. Ignoring.",
                    val
                ),
            }
        }
    }

    /// Endpoint override configured for `provider`, if any
    pub fn endpoint_override(&self, provider: Provider) -> Option<&str> {
        self.spec
            .providers
            .iter()
            .find(|p| p.provider == provider)
            .and_then(|p| p.endpoint.as_deref())
    }

    pub fn set_endpoint(&mut self, provider: Provider, endpoint: String) {
        match self.spec.providers.iter_mut().find(|p| p.provider == provider) {
            Some(existing) => existing.endpoint = Some(endpoint),
            None => self.spec.providers.push(ProviderConfig {
                provider,
                endpoint: Some(endpoint),
            }),
        }
    }

    /// Model of the default provider used for new sessions
    pub fn default_model(&self) -> String {
        self.spec
            .defaults
            .model
            .clone()
            .unwrap_or_else(|| self.spec.defaults.provider.default_model().to_string())
    }

    /// Configured key store path with a leading `~/` expanded
    pub fn key_store_path(&self) -> Option<PathBuf> {
        match &self.spec.key_store.path {
            Some(path) => match path.strip_prefix("~") {
                Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
                Err(_) => Some(path.clone()),
            },
            None => dirs::home_dir().map(|home| home.join(".schema-playground").join("keys.json")),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for provider in &self.spec.providers {
            if let Some(endpoint) = &provider.endpoint {
                url::Url::parse(endpoint).map_err(|e| {
                    anyhow::anyhow!("Invalid endpoint for {}: '{}' ({})", provider.provider, endpoint, e)
                })?;
            }
        }

        let defaults = &self.spec.defaults;
        if let Some(model) = &defaults.model {
            if !defaults.provider.supports_model(model) {
                anyhow::bail!(
                    "Default model '{}' is not available for {}. Available: {}",
                    model,
                    defaults.provider,
                    defaults.provider.models().join(", ")
                );
            }
        }

        if self.spec.http.timeout_secs == 0 {
            anyhow::bail!("spec.http.timeout_secs must be greater than zero");
        }

        if self.spec.validation.cache_capacity == 0 {
            anyhow::bail!("spec.validation.cache_capacity must be greater than zero");
        }

        Ok(())
    }
}
