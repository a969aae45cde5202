//! Persisted token records.
//!
//! Expiry timestamps are epoch milliseconds, matching the representation
//! written to the client-side key-value store.

use serde::{Deserialize, Serialize};

/// The access/refresh token pair held for the current session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque, server-signed access token.
    pub access_token: String,
    /// Refresh token, when the identity API issued one.
    pub refresh_token: Option<String>,
    /// When the access token stops being used (epoch ms).
    pub expires_at: i64,
    /// Ceiling for optimistic extensions (epoch ms).
    pub absolute_expires_at: i64,
}

impl TokenRecord {
    /// Whether the access token is still usable at `now_ms`.
    pub fn is_live(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }

    /// Milliseconds left before expiry (0 once expired).
    pub fn remaining_millis(&self, now_ms: i64) -> u64 {
        self.expires_at.saturating_sub(now_ms).max(0) as u64
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .field("absolute_expires_at", &self.absolute_expires_at)
            .finish()
    }
}

/// A cached anti-forgery token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfTokenRecord {
    /// Opaque token value.
    pub token: String,
    /// When the server stops accepting it (epoch ms).
    pub expires_at: i64,
}

impl CsrfTokenRecord {
    /// Whether the token can still be sent at `now_ms`, keeping
    /// `margin_ms` in reserve.
    pub fn is_fresh(&self, now_ms: i64, margin_ms: i64) -> bool {
        now_ms < self.expires_at.saturating_sub(margin_ms)
    }
}

impl std::fmt::Debug for CsrfTokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokenRecord")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
