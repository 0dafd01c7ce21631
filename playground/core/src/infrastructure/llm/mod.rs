// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each provider adapter translates between our domain call contract and the
// provider's request/response shapes.

pub mod openai;
pub mod ollama;
pub mod registry;

pub use ollama::OllamaAdapter;
pub use openai::OpenAIAdapter;
pub use registry::{ProviderEntry, ProviderRegistry};
