//! Integration tests for Shopfront.
//!
//! Tests drive the public storefront API end to end against the in-memory
//! commerce backend and a real file store in a throwaway directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shopfront_core::{CustomerId, Email};
use shopfront_storefront::config::StorageConfig;
use shopfront_storefront::state::AppState;
use shopfront_storefront::storage::{FileStore, StorageError};
use shopfront_storefront::testing::FakeCommerce;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "hunter22";

/// A data directory removed when dropped.
pub struct TempDir(PathBuf);

impl TempDir {
    #[must_use]
    pub fn new() -> Self {
        Self(std::env::temp_dir().join(format!("shopfront-test-{}", uuid::Uuid::new_v4())))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Fake backend plus application state persisted under a temp directory.
pub struct TestContext {
    pub fake: Arc<FakeCommerce>,
    pub state: AppState,
    pub customer_id: CustomerId,
    pub dir: TempDir,
}

impl TestContext {
    /// A store with one registered customer ([`EMAIL`] / [`PASSWORD`]).
    #[must_use]
    pub fn new() -> Self {
        let fake = Arc::new(FakeCommerce::new());
        let email = Email::parse(EMAIL).expect("test email is valid");
        let customer_id = fake.add_customer(&email, PASSWORD, Some("Ada"));
        let dir = TempDir::new();
        let state = state_for(&fake, dir.path()).expect("Failed to open test store");
        Self {
            fake,
            state,
            customer_id,
            dir,
        }
    }

    /// A fresh `AppState` over the same backend and directory, as if the
    /// program had been restarted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be read.
    pub fn restart(&self) -> Result<AppState, StorageError> {
        state_for(&self.fake, self.dir.path())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn state_for(fake: &Arc<FakeCommerce>, dir: &Path) -> Result<AppState, StorageError> {
    let storage = StorageConfig {
        data_dir: dir.to_path_buf(),
        ..StorageConfig::default()
    };
    let store = FileStore::open(&storage.data_dir)?;
    Ok(AppState::from_parts(
        storage,
        Arc::new(store),
        fake.clone(),
        fake.clone(),
        None,
    ))
}
