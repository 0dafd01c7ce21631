// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod config;
pub mod defaults;
pub mod events;
pub mod llm;
pub mod provider;
pub mod session;
pub mod validation;

pub use llm::{ConfigurationIssue, ExecutionError, ExecutionErrorKind, ExecutionRequest, ExecutionResult, ProviderAdapter, ProviderRequest};
pub use provider::Provider;
pub use session::{Mode, OutputPaneState, SessionState};
pub use validation::{OutcomeKind, SchemaValidator, ValidationBackend, ValidationIssue, ValidationOutcome};
