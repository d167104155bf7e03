//! JSON-file backed key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::{KeyValueStore, StorageError};

/// File name used inside the data directory.
const STORE_FILE: &str = "store.json";

/// [`KeyValueStore`] persisted as a single JSON object on disk.
///
/// The whole map is held in memory and the file is rewritten (temp file then
/// rename) after every change, so a crash mid-write leaves the previous
/// contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the store file
    /// exists but cannot be read or parsed.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE);

        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                StorageError::CorruptFile {
                    path: path.display().to_string(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), "Opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Encode {
                key: STORE_FILE.to_string(),
                source,
            })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            // Keep memory consistent with disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("shopfront-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = scratch_dir();
        {
            let store = FileStore::open(&dir).unwrap();
            store.set("shopify_cart_guest", "gid://shopify/Cart/1").unwrap();
            store.set("current_user", "{}").unwrap();
            store.remove("current_user").unwrap();
        }

        let store = FileStore::open(&dir).unwrap();
        assert_eq!(
            store.get("shopify_cart_guest").unwrap().as_deref(),
            Some("gid://shopify/Cart/1")
        );
        assert_eq!(store.get("current_user").unwrap(), None);
        assert!(!dir.join("store.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STORE_FILE), b"not json").unwrap();

        let err = FileStore::open(&dir).unwrap_err();
        assert!(matches!(err, StorageError::CorruptFile { .. }));

        fs::remove_dir_all(dir).unwrap();
    }
}
