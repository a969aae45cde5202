//! Anti-forgery token cache with coalesced fetching and a single-retry rule.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use tourdesk_core::config::CsrfConfig;
use tourdesk_core::error::ErrorKind;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::{Clock, KeyValueStore};
use tourdesk_core::types::HttpMethod;
use tourdesk_entity::session::CsrfTokenRecord;
use tourdesk_store::StoreKeys;

use crate::api::IdentityApi;

/// Cache state of the anti-forgery token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfState {
    /// No token is held; the next request fetches one.
    Absent,
    /// A token and its expiry.
    Cached(CsrfTokenRecord),
}

/// Holds the anti-forgery token for state-changing requests.
///
/// Concurrent callers that find no usable token share a single fetch.
/// The token is mirrored into the key-value store so a restarted client
/// can reuse it until it nears expiry.
#[derive(Debug)]
pub struct CsrfManager {
    api: Arc<dyn IdentityApi>,
    store: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
    header_name: String,
    state: Mutex<CsrfState>,
    /// Serializes fetches.
    fetch_lock: tokio::sync::Mutex<()>,
    /// Bumped by `invalidate`; a fetch started under an older epoch is not cached.
    epoch: AtomicU64,
    fetches: AtomicU64,
}

impl CsrfManager {
    /// Creates a manager with an empty cache.
    pub fn new(
        api: Arc<dyn IdentityApi>,
        store: Arc<dyn KeyValueStore>,
        keys: StoreKeys,
        clock: Arc<dyn Clock>,
        config: &CsrfConfig,
    ) -> Self {
        Self {
            api,
            store,
            keys,
            clock,
            safety_margin: config.safety_margin(),
            header_name: config.header_name.clone(),
            state: Mutex::new(CsrfState::Absent),
            fetch_lock: tokio::sync::Mutex::new(()),
            epoch: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    /// Name of the request header carrying the token.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Current cache state.
    pub fn state(&self) -> CsrfState {
        self.lock_state().clone()
    }

    /// Number of tokens fetched from the identity API so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// A token usable for at least the safety margin, fetching one if needed.
    pub async fn token(&self) -> AppResult<String> {
        if let Some(token) = self.usable() {
            debug!("Forgery token cache hit");
            return Ok(token);
        }

        let _guard = self.fetch_lock.lock().await;

        // Another caller may have fetched while we waited.
        if let Some(token) = self.usable() {
            return Ok(token);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = self.api.csrf_token().await?;

        let lifetime_ms = i64::try_from(response.expires_in.saturating_mul(1000)).unwrap_or(i64::MAX);
        let record = CsrfTokenRecord {
            token: response.csrf_token,
            expires_at: self.clock.now_millis().saturating_add(lifetime_ms),
        };

        if self.epoch.load(Ordering::SeqCst) == epoch {
            self.persist(&record);
            *self.lock_state() = CsrfState::Cached(record.clone());
            info!(expires_in = response.expires_in, "Fetched forgery token");
        } else {
            debug!("Forgery token invalidated during fetch; not caching");
        }

        Ok(record.token)
    }

    /// The token to attach for `method`: `None` for safe methods.
    pub async fn token_for(&self, method: HttpMethod) -> AppResult<Option<String>> {
        if method.is_state_changing() {
            Ok(Some(self.token().await?))
        } else {
            Ok(None)
        }
    }

    /// Drop the cached token and its persisted copy.
    pub(crate) fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.lock_state() = CsrfState::Absent;

        let keys = self.keys.csrf_keys();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        if let Err(e) = self.store.delete_many(&keys) {
            warn!(error = %e, "Failed to remove persisted forgery token");
        }
    }

    /// Run a request with the token `method` needs.
    ///
    /// When the server rejects the token, the token is invalidated, a new
    /// one is fetched, and the request is replayed exactly once. A second
    /// rejection is returned to the caller.
    pub async fn execute<T, F, Fut>(&self, method: HttpMethod, mut request: F) -> AppResult<T>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let token = self.token_for(method).await?;

        match request(token).await {
            Err(e) if e.is(ErrorKind::ForgeryTokenInvalid) && method.is_state_changing() => {
                warn!(method = %method, "Forgery token rejected; retrying with a fresh token");
                self.invalidate();
                let token = self.token().await?;
                request(Some(token)).await
            }
            result => result,
        }
    }

    /// The cached token if fresh, restoring a persisted one when the cache
    /// is empty.
    fn usable(&self) -> Option<String> {
        let now = self.clock.now_millis();
        let margin = i64::try_from(self.safety_margin.as_millis()).unwrap_or(i64::MAX);
        let mut state = self.lock_state();

        if let CsrfState::Absent = *state {
            if let Some(record) = self.restore() {
                *state = CsrfState::Cached(record);
            }
        }

        match &*state {
            CsrfState::Cached(record) if record.is_fresh(now, margin) => Some(record.token.clone()),
            _ => None,
        }
    }

    fn restore(&self) -> Option<CsrfTokenRecord> {
        let read = || -> AppResult<Option<CsrfTokenRecord>> {
            let Some(token) = self.store.get(&self.keys.csrf_token())? else {
                return Ok(None);
            };
            let expires_at = self
                .store
                .get(&self.keys.csrf_expires_at())?
                .and_then(|value| value.parse::<i64>().ok());
            Ok(expires_at.map(|expires_at| CsrfTokenRecord { token, expires_at }))
        };

        match read() {
            Ok(record) => {
                if record.is_some() {
                    debug!("Restored persisted forgery token");
                }
                record
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted forgery token");
                None
            }
        }
    }

    fn persist(&self, record: &CsrfTokenRecord) {
        let token_key = self.keys.csrf_token();
        let expires_key = self.keys.csrf_expires_at();
        let expires_at = record.expires_at.to_string();

        if let Err(e) = self.store.set_many(&[
            (token_key.as_str(), record.token.as_str()),
            (expires_key.as_str(), expires_at.as_str()),
        ]) {
            warn!(error = %e, "Failed to persist forgery token");
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CsrfState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
