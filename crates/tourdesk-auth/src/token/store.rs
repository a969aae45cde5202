//! Client-side token persistence with lazy expiry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use tourdesk_core::config::SessionConfig;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::{Clock, KeyValueStore};
use tourdesk_entity::session::TokenRecord;
use tourdesk_store::StoreKeys;

use super::claims::{DisplayClaims, decode_claims};
use crate::csrf::CsrfManager;

/// Reads and writes the session tokens in the key-value store.
///
/// Expiry is checked lazily: every read compares the stored expiry with
/// the clock and purges a stale record before reporting "no token".
#[derive(Debug)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
    clock: Arc<dyn Clock>,
    access_lifetime: Duration,
    absolute_lifetime: Duration,
    csrf: Arc<CsrfManager>,
}

impl TokenStore {
    /// Creates a token store over `store`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: StoreKeys,
        clock: Arc<dyn Clock>,
        config: &SessionConfig,
        csrf: Arc<CsrfManager>,
    ) -> Self {
        Self {
            store,
            keys,
            clock,
            access_lifetime: config.access_lifetime(),
            absolute_lifetime: config.absolute_lifetime(),
            csrf,
        }
    }

    /// Persist a freshly issued token pair, replacing any previous record.
    pub fn set_tokens(&self, access_token: &str, refresh_token: Option<&str>) -> AppResult<()> {
        let now = self.clock.now_millis();
        self.write(access_token, refresh_token, now)
    }

    /// The access token, or `None` once it has expired.
    pub fn access_token(&self) -> Option<String> {
        let record = self.record()?;
        if record.is_live(self.clock.now_millis()) {
            Some(record.access_token)
        } else {
            debug!("Access token expired; purging");
            self.purge();
            None
        }
    }

    /// The refresh token, when one was issued.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(&self.keys.refresh_token())
    }

    /// Time left before the access token expires.
    pub fn remaining_time(&self) -> Duration {
        self.record()
            .map(|record| Duration::from_millis(record.remaining_millis(self.clock.now_millis())))
            .unwrap_or(Duration::ZERO)
    }

    /// Push the expiry to one access lifetime from now, without passing the
    /// absolute ceiling. Returns whether the expiry moved.
    pub fn extend(&self) -> bool {
        let Some(record) = self.record() else {
            return false;
        };
        let now = self.clock.now_millis();
        if !record.is_live(now) {
            return false;
        }

        let target = now
            .saturating_add(millis(self.access_lifetime))
            .min(record.absolute_expires_at);
        if target <= record.expires_at {
            return false;
        }

        match self
            .store
            .set(&self.keys.token_expires_at(), &target.to_string())
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to extend session expiry");
                false
            }
        }
    }

    /// Install a token obtained from a background refresh.
    ///
    /// Only applies while a live session record exists, so a refresh that
    /// lands after logout or idle expiry cannot resurrect the session. The
    /// expiry and the absolute ceiling are left alone: the expiry tracks
    /// user activity, not server round trips. Keeps the previous refresh
    /// token when the server did not rotate it.
    pub fn replace_access_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<bool> {
        let Some(record) = self.record() else {
            return Ok(false);
        };
        if !record.is_live(self.clock.now_millis()) {
            return Ok(false);
        }

        let access_key = self.keys.access_token();
        let refresh_key = self.keys.refresh_token();
        match refresh_token {
            Some(refresh) => self
                .store
                .set_many(&[(access_key.as_str(), access_token), (refresh_key.as_str(), refresh)])?,
            None => self.store.set(&access_key, access_token)?,
        }
        Ok(true)
    }

    /// The `Authorization` header for the current access token.
    pub fn bearer_header(&self) -> Option<(&'static str, String)> {
        self.access_token()
            .map(|token| ("Authorization", format!("Bearer {token}")))
    }

    /// Display claims of the current access token.
    pub fn claims(&self) -> Option<DisplayClaims> {
        self.access_token().as_deref().and_then(decode_claims)
    }

    /// Remove every session key and drop the forgery token.
    pub(crate) fn clear(&self) {
        self.purge();
        self.csrf.invalidate();
    }

    /// The stored record, whether live or not.
    pub fn record(&self) -> Option<TokenRecord> {
        let access_token = self.read(&self.keys.access_token())?;
        let expires_at = self
            .read(&self.keys.token_expires_at())
            .and_then(|value| value.parse::<i64>().ok())?;
        let absolute_expires_at = self
            .read(&self.keys.token_absolute_expires_at())
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(expires_at);

        Some(TokenRecord {
            access_token,
            refresh_token: self.refresh_token(),
            expires_at,
            absolute_expires_at,
        })
    }

    fn write(&self, access_token: &str, refresh_token: Option<&str>, now: i64) -> AppResult<()> {
        let expires_at = now.saturating_add(millis(self.access_lifetime)).to_string();
        let absolute = now.saturating_add(millis(self.absolute_lifetime)).to_string();
        let access_key = self.keys.access_token();
        let refresh_key = self.keys.refresh_token();
        let expires_key = self.keys.token_expires_at();
        let absolute_key = self.keys.token_absolute_expires_at();

        let mut entries = vec![
            (access_key.as_str(), access_token),
            (expires_key.as_str(), expires_at.as_str()),
            (absolute_key.as_str(), absolute.as_str()),
        ];
        match refresh_token {
            Some(refresh) => {
                entries.push((refresh_key.as_str(), refresh));
                self.store.set_many(&entries)
            }
            None => {
                self.store.set_many(&entries)?;
                self.store.delete(&refresh_key)
            }
        }
    }

    fn purge(&self) {
        let keys = self.keys.session_keys();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        if let Err(e) = self.store.delete_many(&keys) {
            warn!(error = %e, "Failed to remove session tokens");
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session store");
                None
            }
        }
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
