//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so that a missing
//! section falls back to the documented values.

pub mod api;
pub mod auth;
pub mod logging;
pub mod session;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::auth::CsrfConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root client configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Identity API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Token lifetime, refresh, and idle-monitor settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Anti-forgery token settings.
    #[serde(default)]
    pub csrf: CsrfConfig,
    /// Client-side key-value store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TOURDESK_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TOURDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
