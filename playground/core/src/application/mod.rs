// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod execution;
pub mod playground;
pub mod validation_service;

pub use execution::ExecutionService;
pub use playground::Playground;
pub use validation_service::ValidationService;
