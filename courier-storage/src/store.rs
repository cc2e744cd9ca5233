//! Key-value local store abstraction.
//!
//! The store holds JSON values under string keys. Single-key writes are
//! atomic at the storage-call granularity; there is no multi-key
//! transaction.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use courier_core::{CourierResult, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::Io {
        reason: err.to_string(),
    }
}

/// Durable (or session-scoped) key-value storage for JSON values.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: serde_json::Value) -> CourierResult<()>;

    /// Load the value under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> CourierResult<Option<serde_json::Value>>;

    /// Remove the value under `key`. Idempotent.
    async fn remove(&self, key: &str) -> CourierResult<()>;
}

/// Typed convenience layer over [`LocalStore`].
#[async_trait]
pub trait LocalStoreExt: LocalStore {
    async fn save_as<T: Serialize + Sync>(&self, key: &str, value: &T) -> CourierResult<()> {
        let value = serde_json::to_value(value).map_err(|err| StorageError::Serialize {
            reason: err.to_string(),
        })?;
        self.save(key, value).await
    }

    async fn load_as<T: DeserializeOwned>(&self, key: &str) -> CourierResult<Option<T>> {
        match self.load(key).await? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|err| {
                StorageError::Deserialize {
                    key: key.to_string(),
                    reason: err.to_string(),
                }
                .into()
            }),
        }
    }
}

impl<S: LocalStore + ?Sized> LocalStoreExt for S {}

/// Session-only store. Data lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn save(&self, key: &str, value: serde_json::Value) -> CourierResult<()> {
        self.entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn load(&self, key: &str) -> CourierResult<Option<serde_json::Value>> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .get(key)
            .cloned())
    }

    async fn remove(&self, key: &str) -> CourierResult<()> {
        self.entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}

/// Durable store keeping one JSON file per key under a root directory.
///
/// Writes go to a temp file first and are renamed into place, so a single
/// key is never observed half-written. Keys are flattened to a
/// filesystem-safe alphabet.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> CourierResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(io_error)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn save(&self, key: &str, value: serde_json::Value) -> CourierResult<()> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&value).map_err(|err| StorageError::Serialize {
            reason: err.to_string(),
        })?;
        tokio::fs::write(&staging, &bytes).await.map_err(io_error)?;
        tokio::fs::rename(&staging, &path).await.map_err(io_error)?;
        Ok(())
    }

    async fn load(&self, key: &str) -> CourierResult<Option<serde_json::Value>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|err| {
                StorageError::Deserialize {
                    key: key.to_string(),
                    reason: err.to_string(),
                }
                .into()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err).into()),
        }
    }

    async fn remove(&self, key: &str) -> CourierResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(err).into()),
        }
    }
}
