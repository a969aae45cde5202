//! Key-value store persisted as a single JSON document.
//!
//! The whole map is rewritten on every mutation through a temporary file
//! and a rename, so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::key_value::KeyValueStore;

/// File-backed store provider. Clones share the same document.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Location of the JSON document.
    path: PathBuf,
    /// In-memory view of the document.
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open the document at `path`, creating parent directories as needed.
    ///
    /// A missing document starts empty. An unreadable or corrupt document is
    /// discarded with a warning; losing cached session state only means the
    /// user has to sign in again.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt session store");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Session store unreadable, starting empty");
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::storage("File store lock poisoned"))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> AppResult<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        apply(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&self, items: &[(&str, &str)]) -> AppResult<()> {
        self.mutate(|entries| {
            for (key, value) in items {
                entries.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn delete_many(&self, keys: &[&str]) -> AppResult<()> {
        self.mutate(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
