// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Events
//!
//! Playground events published on the event bus.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Observable lifecycle of execute and validate actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::llm::ExecutionErrorKind;
use super::provider::Provider;
use super::validation::{OutcomeKind, ValidationBackend};

/// Monotonically increasing identifier handed out per triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Independent token sequences; an execute never supersedes a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestChannel {
    Execution,
    Validation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaygroundEvent {
    ExecutionStarted {
        token: RequestToken,
        provider: Provider,
        model: String,
        started_at: DateTime<Utc>,
    },
    ExecutionCompleted {
        token: RequestToken,
        provider: Provider,
        output_chars: usize,
        completed_at: DateTime<Utc>,
    },
    ExecutionFailed {
        token: RequestToken,
        provider: Provider,
        kind: ExecutionErrorKind,
        message: String,
        failed_at: DateTime<Utc>,
    },
    ValidationCompleted {
        token: RequestToken,
        backend: ValidationBackend,
        kind: OutcomeKind,
        error_count: usize,
        completed_at: DateTime<Utc>,
    },
    StaleResultDiscarded {
        channel: RequestChannel,
        token: RequestToken,
        latest: RequestToken,
    },
}

impl PlaygroundEvent {
    pub fn token(&self) -> RequestToken {
        match self {
            PlaygroundEvent::ExecutionStarted { token, .. }
            | PlaygroundEvent::ExecutionCompleted { token, .. }
            | PlaygroundEvent::ExecutionFailed { token, .. }
            | PlaygroundEvent::ValidationCompleted { token, .. }
            | PlaygroundEvent::StaleResultDiscarded { token, .. } => *token,
        }
    }
}
