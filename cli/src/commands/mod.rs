// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the playground CLI

pub mod config;
pub mod input;
pub mod key;
pub mod providers;
pub mod run;
pub mod session;
pub mod validate;

pub use self::config::ConfigCommand;
pub use self::key::KeyCommand;
pub use self::run::RunArgs;
pub use self::session::SessionCommand;
pub use self::validate::ValidateArgs;
