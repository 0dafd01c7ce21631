// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Validation Service
//!
//! Front door for output validation: parses the candidate and schema text,
//! dispatches to the configured backend and classifies the result into a
//! [`ValidationOutcome`].
//!
//! The candidate is parsed before the schema, so non-JSON output is reported
//! as `InvalidJson` even when the schema is broken too.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::config::PlaygroundConfigManifest;
use crate::domain::validation::{
    SchemaValidator, ValidationBackend, ValidationError, ValidationOutcome,
};
use crate::infrastructure::validation::{CompiledValidator, RegistryValidator, SchemaRegistry};

pub struct ValidationService {
    compiled: Arc<CompiledValidator>,
    registry: Arc<RegistryValidator>,
}

impl ValidationService {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            compiled: Arc::new(CompiledValidator::new(cache_capacity)),
            registry: Arc::new(RegistryValidator::new(Arc::new(SchemaRegistry::new()))),
        }
    }

    pub fn from_config(config: &PlaygroundConfigManifest) -> Self {
        Self::new(config.spec.validation.cache_capacity)
    }

    pub fn validator(&self, backend: ValidationBackend) -> Arc<dyn SchemaValidator> {
        match backend {
            ValidationBackend::CompiledSync => self.compiled.clone() as Arc<dyn SchemaValidator>,
            ValidationBackend::RegistryAsync => self.registry.clone(),
        }
    }

    pub async fn validate(
        &self,
        schema_text: &str,
        candidate_text: &str,
        backend: ValidationBackend,
    ) -> ValidationOutcome {
        let candidate: Value = match serde_json::from_str(candidate_text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Candidate is not JSON: {}", e);
                return ValidationOutcome::invalid_json(e);
            }
        };

        let schema: Value = match serde_json::from_str(schema_text) {
            Ok(value) => value,
            Err(e) => {
                return ValidationOutcome::schema_parse_error(format!("Error parsing schema: {}", e))
            }
        };

        self.validate_value(&schema, &candidate, backend).await
    }

    /// Validates already parsed JSON
    pub async fn validate_value(
        &self,
        schema: &Value,
        candidate: &Value,
        backend: ValidationBackend,
    ) -> ValidationOutcome {
        match self.validator(backend).validate(schema, candidate).await {
            Ok(issues) if issues.is_empty() => ValidationOutcome::valid(),
            Ok(issues) => {
                debug!(backend = %backend, count = issues.len(), "Candidate violates schema");
                ValidationOutcome::schema_invalid(issues)
            }
            Err(e @ ValidationError::SchemaCompile(_)) => {
                ValidationOutcome::schema_parse_error(e.to_string())
            }
            Err(e) => {
                warn!(backend = %backend, "Validator backend failed: {}", e);
                ValidationOutcome::schema_parse_error(e.to_string())
            }
        }
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new(64)
    }
}
