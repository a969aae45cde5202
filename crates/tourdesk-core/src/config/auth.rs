//! Anti-forgery token configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Forgery-protection (CSRF) token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// A cached token is refetched once it is this close to expiry.
    #[serde(default = "default_safety_margin")]
    pub safety_margin_minutes: u64,
    /// Request header carrying the token on state-changing calls.
    #[serde(default = "default_header_name")]
    pub header_name: String,
}

impl CsrfConfig {
    /// The safety margin as a [`Duration`].
    pub fn safety_margin(&self) -> Duration {
        Duration::from_secs(self.safety_margin_minutes * 60)
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            safety_margin_minutes: default_safety_margin(),
            header_name: default_header_name(),
        }
    }
}

fn default_safety_margin() -> u64 {
    5
}

fn default_header_name() -> String {
    "X-CSRF-Token".to_string()
}
