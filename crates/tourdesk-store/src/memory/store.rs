//! In-memory key-value store using the dashmap crate.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use tourdesk_core::result::AppResult;
use tourdesk_core::traits::key_value::KeyValueStore;

/// In-memory store provider. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// The underlying concurrent map.
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        if self.entries.remove(key).is_some() {
            debug!(key, "Removed store entry");
        }
        Ok(())
    }
}
