//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use tourdesk_core::config::StorageConfig;
use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::key_value::KeyValueStore;

use crate::keys::StoreKeys;

/// Store manager that wraps the configured key-value provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store provider.
    inner: Arc<dyn KeyValueStore>,
    /// Key builder for the configured prefix.
    keys: StoreKeys,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory session store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.path, "Initializing file session store");
                Arc::new(crate::file::FileStore::open(&config.path)?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self {
            inner,
            keys: StoreKeys::new(config.key_prefix.clone()),
        })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self {
            inner: provider,
            keys,
        }
    }

    /// Shared handle to the inner provider.
    pub fn provider(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }

    /// Key builder for the configured prefix.
    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }
}

impl KeyValueStore for StoreManager {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        self.inner.set_many(entries)
    }

    fn delete_many(&self, keys: &[&str]) -> AppResult<()> {
        self.inner.delete_many(keys)
    }
}
