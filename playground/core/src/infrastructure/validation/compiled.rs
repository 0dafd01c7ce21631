// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Compiled Validator
//!
//! Synchronous backend: the schema is compiled into a reusable
//! `jsonschema::Validator` and evaluated once per call, collecting every error.
//!
//! Compiled validators are cached by the SHA-256 of the schema document so an
//! edited schema always gets a fresh validator and an unchanged one is not
//! recompiled on every keystroke.

use async_trait::async_trait;
use jsonschema::Validator;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::validation::{SchemaValidator, ValidationBackend, ValidationError, ValidationIssue};

pub struct CompiledValidator {
    cache: Mutex<LruCache<String, Arc<Validator>>>,
}

impl CompiledValidator {
    pub fn new(cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Content hash used as cache key
    pub fn schema_digest(schema: &Value) -> String {
        hex::encode(Sha256::digest(schema.to_string().as_bytes()))
    }

    /// Returns the cached validator for `schema`, compiling it on a miss
    pub fn compile(&self, schema: &Value) -> Result<Arc<Validator>, ValidationError> {
        let digest = Self::schema_digest(schema);

        if let Some(validator) = self.cache.lock().get(&digest) {
            debug!(schema = %&digest[..12], "Compiled validator cache hit");
            return Ok(validator.clone());
        }

        let validator = jsonschema::draft202012::new(schema)
            .map(Arc::new)
            .map_err(|e| ValidationError::SchemaCompile(e.to_string()))?;

        debug!(schema = %&digest[..12], "Compiled new validator");
        self.cache.lock().put(digest, validator.clone());
        Ok(validator)
    }

    /// Evaluates synchronously, returning every error with its instance path
    pub fn evaluate(
        &self,
        schema: &Value,
        candidate: &Value,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        let validator = self.compile(schema)?;
        Ok(validator
            .iter_errors(candidate)
            .map(|error| ValidationIssue::new(error.instance_path().to_string(), error.to_string()))
            .collect())
    }

    pub fn cached_validators(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Default for CompiledValidator {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl SchemaValidator for CompiledValidator {
    fn backend(&self) -> ValidationBackend {
        ValidationBackend::CompiledSync
    }

    async fn validate(
        &self,
        schema: &Value,
        candidate: &Value,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        self.evaluate(schema, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_all_errors() {
        let validator = CompiledValidator::default();
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name", "age"]
        });

        let issues = validator
            .evaluate(&schema, &json!({"name": 7, "age": -1}))
            .unwrap();
        assert_eq!(issues.len(), 2);
        let locations: Vec<&str> = issues.iter().map(|i| i.location.as_str()).collect();
        assert!(locations.contains(&"/name"));
        assert!(locations.contains(&"/age"));
    }

    #[test]
    fn test_valid_candidate_has_no_issues() {
        let validator = CompiledValidator::default();
        let schema = json!({"type": "array", "items": {"type": "number"}});
        assert!(validator.evaluate(&schema, &json!([1, 2.5])).unwrap().is_empty());
    }

    #[test]
    fn test_cache_is_keyed_by_schema_content() {
        let validator = CompiledValidator::new(2);
        let a = json!({"type": "string"});
        let b = json!({"type": "number"});

        validator.compile(&a).unwrap();
        validator.compile(&a).unwrap();
        assert_eq!(validator.cached_validators(), 1);

        validator.compile(&b).unwrap();
        assert_eq!(validator.cached_validators(), 2);

        // A changed schema must not reuse the old validator
        assert!(validator.evaluate(&b, &json!("text")).unwrap().len() == 1);
        assert!(validator.evaluate(&a, &json!("text")).unwrap().is_empty());
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let validator = CompiledValidator::new(1);
        validator.compile(&json!({"type": "string"})).unwrap();
        validator.compile(&json!({"type": "number"})).unwrap();
        assert_eq!(validator.cached_validators(), 1);
    }

    #[test]
    fn test_invalid_schema_is_compile_error() {
        let validator = CompiledValidator::default();
        let err = validator
            .evaluate(&json!({"type": "not-a-type"}), &json!(1))
            .unwrap_err();
        assert!(matches!(err, ValidationError::SchemaCompile(_)));
    }

    #[test]
    fn test_trait_dispatch_matches_direct_evaluation() {
        let validator = CompiledValidator::default();
        let schema = json!({"type": "object", "required": ["answer"]});
        let candidate = json!({});

        let via_trait =
            tokio_test::block_on(SchemaValidator::validate(&validator, &schema, &candidate)).unwrap();
        assert_eq!(via_trait, validator.evaluate(&schema, &candidate).unwrap());
        assert_eq!(validator.backend(), ValidationBackend::CompiledSync);
    }
}
