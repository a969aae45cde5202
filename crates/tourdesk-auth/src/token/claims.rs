//! Display-only claims read from an access token payload.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims decoded from an access token **without** verifying its signature.
///
/// Suitable for display (greeting, avatar initials) only. The role is kept
/// as the raw string and there is no conversion into an
/// [`AuthorizedUser`](tourdesk_entity::user::AuthorizedUser), so these
/// claims can never reach an authorization decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayClaims {
    /// Subject, usually the user ID.
    #[serde(default)]
    pub sub: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Role name exactly as written in the token.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
}

impl DisplayClaims {
    /// The expiration time, when present.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// The issue time, when present.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }
}

/// Decode the payload segment of a compact JWS.
///
/// Returns `None` for anything that is not three dot-separated segments
/// with a base64url JSON object in the middle.
pub fn decode_claims(token: &str) -> Option<DisplayClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
