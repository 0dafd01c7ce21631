// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use playground_core::application::validation_service::ValidationService;
use playground_core::domain::defaults::DEFAULT_JSON_SCHEMA;
use playground_core::domain::validation::{OutcomeKind, ValidationBackend};

const PROCESS_STEPS: &str = r#"{
  "steps": [
    {"description": "Add 2 and 2", "result": "4"}
  ],
  "final_result": "4"
}"#;

// Generic key/value list parameterised through dynamic anchors
const DYNAMIC_PAIRS_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "array",
  "items": {
    "type": "object",
    "properties": {
      "key": {"$dynamicRef": "#TKey"},
      "value": {"$dynamicRef": "#TValue"}
    },
    "required": ["key", "value"]
  },
  "$defs": {
    "key": {"$dynamicAnchor": "TKey", "type": "integer"},
    "value": {"$dynamicAnchor": "TValue", "type": "integer"}
  }
}"##;

#[tokio::test]
async fn default_scenario_is_valid_on_both_backends() {
    let service = ValidationService::default();
    for backend in ValidationBackend::all() {
        let outcome = service.validate(DEFAULT_JSON_SCHEMA, PROCESS_STEPS, *backend).await;
        assert_eq!(outcome.kind, OutcomeKind::Valid, "{}: {:?}", backend, outcome.errors);
        assert!(outcome.valid);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.report(), "✅ Valid JSON that matches the schema");
    }
}

#[tokio::test]
async fn non_json_candidate_is_invalid_json_on_both_backends() {
    let service = ValidationService::default();
    for backend in ValidationBackend::all() {
        let outcome = service.validate(DEFAULT_JSON_SCHEMA, "not json", *backend).await;
        assert_eq!(outcome.kind, OutcomeKind::InvalidJson);
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.starts_with("Invalid JSON"));
    }
}

#[tokio::test]
async fn schema_violations_report_every_issue_with_locations() {
    let service = ValidationService::default();
    let candidate = r#"{"steps":[{"description":"add","result":4,"extra":true}],"final_result":4}"#;

    for backend in ValidationBackend::all() {
        let outcome = service.validate(DEFAULT_JSON_SCHEMA, candidate, *backend).await;
        assert_eq!(outcome.kind, OutcomeKind::SchemaInvalid, "{}", backend);
        assert!(outcome.errors.len() >= 3, "{}: {:?}", backend, outcome.errors);
        assert!(
            outcome.errors.iter().any(|issue| issue.location == "/final_result"),
            "{}: {:?}",
            backend,
            outcome.errors
        );
        assert!(outcome.report().starts_with("❌ Schema validation errors:\n"));
    }
}

#[tokio::test]
async fn dynamic_anchors_resolve_on_both_backends() {
    let service = ValidationService::default();
    for backend in ValidationBackend::all() {
        let ok = service
            .validate(DYNAMIC_PAIRS_SCHEMA, r#"[{"key":5,"value":10}]"#, *backend)
            .await;
        assert!(ok.valid, "{}: {:?}", backend, ok.errors);

        let ko = service
            .validate(DYNAMIC_PAIRS_SCHEMA, r#"[{"key":5,"value":"ten"}]"#, *backend)
            .await;
        assert_eq!(ko.kind, OutcomeKind::SchemaInvalid, "{}", backend);
    }
}

#[tokio::test]
async fn repeated_validation_is_idempotent() {
    let service = ValidationService::default();
    let candidate = r#"{"steps":[],"final_result":7}"#;

    for backend in ValidationBackend::all() {
        let first = service.validate(DEFAULT_JSON_SCHEMA, candidate, *backend).await;
        let second = service.validate(DEFAULT_JSON_SCHEMA, candidate, *backend).await;
        assert_eq!(first, second, "{}", backend);
    }
}

#[tokio::test]
async fn edited_schema_is_not_served_from_cache() {
    let service = ValidationService::default();
    let candidate = r#"{"steps":[],"final_result":"4"}"#;

    let strict = service
        .validate(r#"{"type":"object","required":["answer"]}"#, candidate, ValidationBackend::CompiledSync)
        .await;
    assert!(!strict.valid);

    let relaxed = service
        .validate(r#"{"type":"object"}"#, candidate, ValidationBackend::CompiledSync)
        .await;
    assert!(relaxed.valid);
}

#[tokio::test]
async fn overlapping_registry_validations_do_not_collide() {
    let service = std::sync::Arc::new(ValidationService::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let schema = format!(r#"{{"type":"integer","minimum":{}}}"#, i);
                let outcome = service
                    .validate(&schema, "4", ValidationBackend::RegistryAsync)
                    .await;
                (i, outcome.valid)
            })
        })
        .collect();

    for handle in handles {
        let (i, valid) = handle.await.unwrap();
        assert_eq!(valid, i <= 4, "minimum {}", i);
    }
}
