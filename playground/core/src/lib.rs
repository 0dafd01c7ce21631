// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Schema Playground Core
//!
//! Sends a prompt to an LLM provider and validates the returned text against a
//! JSON Schema using one of two interchangeable validator engines.
//!
//! # Architecture
//!
//! - **domain:** providers, requests, validation outcomes, session state, configuration
//! - **application:** execution service, validation facade, session orchestration
//! - **infrastructure:** provider adapters, validator backends, key store, event bus

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
