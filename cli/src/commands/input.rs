// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared helpers for loading configuration, keys and pane contents

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use playground_core::domain::config::PlaygroundConfigManifest;
use playground_core::domain::provider::Provider;
use playground_core::infrastructure::key_store::ApiKeyStore;

pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

pub fn load_config(config_path: Option<PathBuf>) -> Result<PlaygroundConfigManifest> {
    PlaygroundConfigManifest::load_or_default(config_path).context("Failed to load configuration")
}

/// Reads a file, or stdin when `path` is `-`
pub fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Persistent key store for `config`
pub fn open_key_store(config: &PlaygroundConfigManifest) -> ApiKeyStore {
    match config.key_store_path() {
        Some(path) => ApiKeyStore::open(path),
        None => ApiKeyStore::in_memory(),
    }
}

/// Key store used for execution. Falls back to `OPENAI_API_KEY` when no
/// OpenAI key is stored; the fallback is never written to disk.
pub fn execution_key_store(config: &PlaygroundConfigManifest) -> ApiKeyStore {
    let store = open_key_store(config);
    if !store.load(Provider::OpenAI).is_empty() {
        return store;
    }

    match std::env::var(OPENAI_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => {
            debug!("Using {} for OpenAI", OPENAI_KEY_ENV);
            let transient = ApiKeyStore::in_memory();
            if let Err(e) = transient.save(Provider::OpenAI, key.trim()) {
                warn!("Failed to apply {}: {}", OPENAI_KEY_ENV, e);
            }
            transient
        }
        _ => store,
    }
}
