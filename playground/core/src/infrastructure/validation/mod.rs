// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// JSON Schema validator backends
//
// Both implement domain::validation::SchemaValidator and are selected by
// ValidationBackend in the validation facade.

pub mod compiled;
pub mod registry;

pub use compiled::CompiledValidator;
pub use registry::{RegistryValidator, SchemaRegistry};
