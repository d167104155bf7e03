//! Synchronous key-value persistence for shopper-scoped state.
//!
//! Stands in for browser `localStorage`: string keys, string values, read and
//! written synchronously. Two implementations:
//!
//! - [`MemoryStore`] - process-local, used by tests and embedders that persist elsewhere
//! - [`FileStore`] - one JSON file, rewritten atomically on every change
//!
//! Neither coordinates between processes; concurrent writers resolve as last
//! write wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    CorruptFile {
        path: String,
        source: serde_json::Error,
    },

    /// A stored value could not be decoded as the expected type.
    #[error("value under '{key}' is corrupt: {source}")]
    CorruptValue {
        key: String,
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON helpers available on every [`KeyValueStore`], including `dyn KeyValueStore`.
pub trait JsonStoreExt: KeyValueStore {
    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CorruptValue` if the stored text is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StorageError::CorruptValue {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}
