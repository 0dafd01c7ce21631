// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Registry Validator
//!
//! Asynchronous backend: each schema is registered under a process-unique
//! synthetic URI. Evaluation hands the registration to `jsonschema` as a
//! resource and compiles a root that is nothing but `{"$ref": uri}`, so the
//! schema is only ever reached through its URI. The candidate is evaluated
//! on the blocking pool and reported in the JSON Schema "list" (basic)
//! output format.
//!
//! Registrations are removed after evaluation so overlapping validations of
//! edited schemas never share a key.

use async_trait::async_trait;
use jsonschema::{Draft, Validator};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::validation::{SchemaValidator, ValidationBackend, ValidationError, ValidationIssue};

const SYNTHETIC_BASE: &str = "http://temp.schema/";

/// In-process schema registry keyed by synthetic URI
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<Value>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` and returns its URI. Object schemas without an
    /// `$id` get the URI as their base identifier.
    pub async fn register(&self, mut schema: Value) -> String {
        let uri = format!("{}{}", SYNTHETIC_BASE, Uuid::new_v4());

        if let Value::Object(map) = &mut schema {
            map.entry("$id")
                .or_insert_with(|| Value::String(uri.clone()));
        }

        self.schemas.write().await.insert(uri.clone(), Arc::new(schema));
        debug!(%uri, "Registered schema");
        uri
    }

    pub async fn get(&self, uri: &str) -> Option<Arc<Value>> {
        self.schemas.read().await.get(uri).cloned()
    }

    pub async fn unregister(&self, uri: &str) -> bool {
        self.schemas.write().await.remove(uri).is_some()
    }

    pub async fn len(&self) -> usize {
        self.schemas.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub struct RegistryValidator {
    registry: Arc<SchemaRegistry>,
}

impl RegistryValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Evaluates `candidate` against the schema registered under `uri`
    pub async fn evaluate(
        &self,
        uri: &str,
        candidate: Value,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        let schema = self
            .registry
            .get(uri)
            .await
            .ok_or_else(|| ValidationError::SchemaNotRegistered(uri.to_string()))?;

        let uri = uri.to_string();
        tokio::task::spawn_blocking(move || {
            let validator = compile_by_reference(&uri, &schema)?;
            basic_output(&validator, &candidate)
        })
        .await
        .map_err(|e| ValidationError::Backend(format!("evaluation task failed: {}", e)))?
    }
}

/// Builds a validator whose root only references `uri`, with `schema`
/// registered as the resource behind it
fn compile_by_reference(uri: &str, schema: &Value) -> Result<Validator, ValidationError> {
    // Referenced resources skip meta-schema checks, so check it up front
    jsonschema::meta::validate(schema).map_err(|e| ValidationError::SchemaCompile(e.to_string()))?;

    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .with_resource(uri, Draft::Draft202012.create_resource(schema.clone()))
        .build(&json!({ "$ref": uri }))
        .map_err(|e| ValidationError::SchemaCompile(e.to_string()))
}

/// Flattens the evaluation into one issue per failing keyword
fn basic_output(validator: &Validator, candidate: &Value) -> Result<Vec<ValidationIssue>, ValidationError> {
    if validator.is_valid(candidate) {
        return Ok(Vec::new());
    }

    let output = serde_json::to_value(validator.evaluate(candidate).list())
        .map_err(|e| ValidationError::Backend(format!("unserializable output: {}", e)))?;
    let issues = output_units(&output);

    if issues.is_empty() {
        warn!("List output carried no error units; falling back to error iteration");
        return Ok(validator
            .iter_errors(candidate)
            .map(|error| ValidationIssue::new(error.instance_path().to_string(), error.to_string()))
            .collect());
    }

    Ok(issues)
}

/// Reads the output units of a list-format document. Accepts both the
/// `details` + keyword-map shape and the older `errors` + `error` shape.
fn output_units(output: &Value) -> Vec<ValidationIssue> {
    let units = output
        .get("details")
        .or_else(|| output.get("errors"))
        .and_then(Value::as_array);

    let Some(units) = units else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    for unit in units {
        if unit.get("valid").and_then(Value::as_bool) == Some(true) {
            continue;
        }

        let location = unit
            .get("instanceLocation")
            .and_then(Value::as_str)
            .unwrap_or_default();

        match (unit.get("errors"), unit.get("error")) {
            (Some(Value::Object(errors)), _) => {
                for (keyword, message) in errors {
                    let message = message.as_str().map(str::to_string).unwrap_or_else(|| message.to_string());
                    issues.push(ValidationIssue::new(location, format!("{}: {}", keyword, message)));
                }
            }
            (_, Some(Value::String(message))) => {
                let keyword = unit
                    .get("keywordLocation")
                    .or_else(|| unit.get("evaluationPath"))
                    .and_then(Value::as_str)
                    .and_then(|path| path.rsplit('/').next())
                    .unwrap_or("error");
                issues.push(ValidationIssue::new(location, format!("{}: {}", keyword, message)));
            }
            _ => {}
        }
    }

    issues
}

#[async_trait]
impl SchemaValidator for RegistryValidator {
    fn backend(&self) -> ValidationBackend {
        ValidationBackend::RegistryAsync
    }

    async fn validate(
        &self,
        schema: &Value,
        candidate: &Value,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        let uri = self.registry.register(schema.clone()).await;
        let result = self.evaluate(&uri, candidate.clone()).await;
        self.registry.unregister(&uri).await;
        result
    }
}
