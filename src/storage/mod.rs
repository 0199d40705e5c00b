//! Namespaced key-value persistence.
//!
//! Services persist through the [`KeyValueStore`] trait and never touch files
//! directly. Two backends ship with the crate: [`MemoryStore`] for tests and
//! throwaway sessions, and [`FileStore`] which keeps one JSON document per key.
//! [`StorageBackend`] selects between them once at startup.

pub mod file;
pub mod memory;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Async key-value storage holding JSON values under one namespace.
///
/// Implementations must be safe to share between tasks.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. A missing key yields `Ok(None)`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;

    /// Removes a key. Returns true if it existed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Removes every key of this store's namespace.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Rejects keys that could escape the namespace or the data directory.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Storage key cannot be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!("Storage key '{key}' may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Nothing survives the process
    Memory,
    /// JSON files in the data directory
    #[default]
    File,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(format!("Unknown storage kind '{other}'. Expected memory or file")),
        }
    }
}

/// Storage backend chosen at startup.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-process map
    Memory(MemoryStore),
    /// One JSON file per key
    File(FileStore),
}

impl StorageBackend {
    /// Builds the backend for `kind`. `data_dir` is only used by the file backend.
    pub fn new(kind: StorageKind, namespace: &str, data_dir: PathBuf) -> Self {
        match kind {
            StorageKind::Memory => Self::Memory(MemoryStore::new(namespace)),
            StorageKind::File => Self::File(FileStore::new(data_dir, namespace)),
        }
    }

    /// The kind of this backend.
    #[must_use]
    pub const fn kind(&self) -> StorageKind {
        match self {
            Self::Memory(_) => StorageKind::Memory,
            Self::File(_) => StorageKind::File,
        }
    }
}

impl KeyValueStore for StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        match self {
            Self::Memory(store) => store.set(key, value).await,
            Self::File(store) => store.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        match self {
            Self::Memory(store) => store.delete(key).await,
            Self::File(store) => store.delete(key).await,
        }
    }

    async fn clear(&self) -> Result<()> {
        match self {
            Self::Memory(store) => store.clear().await,
            Self::File(store) => store.clear().await,
        }
    }
}
