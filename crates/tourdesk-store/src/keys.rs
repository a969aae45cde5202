//! Key builders for every entry the session core persists.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the client writes.

/// Key builder bound to the configured prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    prefix: String,
}

impl StoreKeys {
    /// Create a key builder for `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    // ── Session token keys ─────────────────────────────────────

    /// Key of the access token.
    pub fn access_token(&self) -> String {
        format!("{}:auth:access_token", self.prefix)
    }

    /// Key of the refresh token.
    pub fn refresh_token(&self) -> String {
        format!("{}:auth:refresh_token", self.prefix)
    }

    /// Key of the access token expiry (epoch ms).
    pub fn token_expires_at(&self) -> String {
        format!("{}:auth:expires_at", self.prefix)
    }

    /// Key of the extension ceiling (epoch ms).
    pub fn token_absolute_expires_at(&self) -> String {
        format!("{}:auth:absolute_expires_at", self.prefix)
    }

    /// All session token keys; they are always cleared together.
    pub fn session_keys(&self) -> [String; 4] {
        [
            self.access_token(),
            self.refresh_token(),
            self.token_expires_at(),
            self.token_absolute_expires_at(),
        ]
    }

    // ── Anti-forgery keys ──────────────────────────────────────

    /// Key of the cached anti-forgery token.
    pub fn csrf_token(&self) -> String {
        format!("{}:csrf:token", self.prefix)
    }

    /// Key of the anti-forgery token expiry (epoch ms).
    pub fn csrf_expires_at(&self) -> String {
        format!("{}:csrf:expires_at", self.prefix)
    }

    /// All anti-forgery keys; cleared together, independently of the session keys.
    pub fn csrf_keys(&self) -> [String; 2] {
        [self.csrf_token(), self.csrf_expires_at()]
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::new("tourdesk")
    }
}
