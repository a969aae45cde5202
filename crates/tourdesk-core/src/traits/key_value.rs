//! Persistent client-side key-value store trait.

use crate::result::AppResult;

/// Trait for client-side key-value backends (in-memory or file-backed).
///
/// All values are strings. Operations are synchronous: a read can never
/// observe a half-written record, and every call completes before the
/// caller continues.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> AppResult<()>;

    /// Write several entries as one unit.
    fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete several keys as one unit.
    fn delete_many(&self, keys: &[&str]) -> AppResult<()> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    /// Check whether a key exists.
    fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Get a typed value by deserializing from JSON.
    fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}
