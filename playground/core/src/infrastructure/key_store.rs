// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! API Key Store
//!
//! Persists one API key per provider in a small JSON file, addressed by
//! `llm-api-key-<Provider>`.
//!
//! Reads never fail: a missing or unreadable file yields empty keys and a
//! warning. Writes update the in-memory copy first, so a failed write still
//! leaves the key usable for the rest of the process.
//!
//! The file is replaced atomically: contents go to a temporary file in the
//! same directory (created owner-only on unix) which is then renamed over
//! the store.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::provider::Provider;

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Failed to write key store {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode key store: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct ApiKeyStore {
    path: Option<PathBuf>,
    keys: Mutex<BTreeMap<String, String>>,
}

impl ApiKeyStore {
    /// Opens the store at `path`, starting empty when it cannot be read
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let keys = Self::read_file(&path);
        Self {
            path: Some(path),
            keys: Mutex::new(keys),
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            keys: Mutex::new(BTreeMap::new()),
        }
    }

    fn read_file(path: &Path) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No key store at {:?}", path);
                return BTreeMap::new();
            }
            Err(e) => {
                warn!("Failed to load API keys from {:?}: {}", path, e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring corrupt key store {:?}: {}", path, e);
            BTreeMap::new()
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Key for `provider`, or empty when none is stored
    pub fn load(&self, provider: Provider) -> String {
        self.keys
            .lock()
            .get(&provider.key_storage_name())
            .cloned()
            .unwrap_or_default()
    }

    /// Stores `key`; an empty key removes the entry
    pub fn save(&self, provider: Provider, key: &str) -> Result<(), KeyStoreError> {
        {
            let mut keys = self.keys.lock();
            let name = provider.key_storage_name();
            if key.is_empty() {
                keys.remove(&name);
            } else {
                keys.insert(name, key.to_string());
            }
        }
        self.persist()
    }

    pub fn clear(&self, provider: Provider) -> Result<(), KeyStoreError> {
        self.save(provider, "")
    }

    fn persist(&self) -> Result<(), KeyStoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(&*self.keys.lock())?;
        let write = |path: &Path| -> std::io::Result<()> {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)?;

            // NamedTempFile is created with mode 0600 on unix
            let mut staged = tempfile::NamedTempFile::new_in(dir)?;
            staged.write_all(content.as_bytes())?;
            staged.as_file().sync_all()?;
            staged.persist(path).map_err(|e| e.error)?;
            debug!("Saved API keys to {:?}", path);
            Ok(())
        };

        write(path).map_err(|source| {
            warn!("Failed to save API keys to {:?}: {}", path, source);
            KeyStoreError::Write {
                path: path.clone(),
                source,
            }
        })
    }
}

/// Masks all but the last four characters for display
pub fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
