//! Client-side key-value store configuration.

use serde::{Deserialize, Serialize};

/// Persistent client-side store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store provider type: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Path of the JSON document used by the `file` provider.
    #[serde(default = "default_path")]
    pub path: String,
    /// Prefix applied to every persisted key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            path: default_path(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_path() -> String {
    "data/session.json".to_string()
}

fn default_key_prefix() -> String {
    "tourdesk".to_string()
}
