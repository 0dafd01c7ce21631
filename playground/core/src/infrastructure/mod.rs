// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod event_bus;
pub mod key_store;
pub mod llm;
pub mod validation;

pub use event_bus::{EventBus, EventBusError, EventReceiver};
pub use key_store::{ApiKeyStore, KeyStoreError};
