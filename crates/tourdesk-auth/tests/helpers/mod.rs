//! Shared test helpers for session integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use tourdesk_auth::{IdentityApi, RequestAuth, SessionContext};
use tourdesk_core::config::ClientConfig;
use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::ManualClock;
use tourdesk_entity::auth::{
    AuthResponse, CsrfTokenResponse, LoginRequest, RefreshResponse, RegisterRequest,
};
use tourdesk_entity::user::{AuthorizedUser, Role, User};
use tourdesk_store::memory::MemoryStore;
use tourdesk_store::{StoreKeys, StoreManager};

/// An identity service kept in memory.
///
/// Anti-forgery tokens are checked the way the server does: only tokens
/// it issued and has not since revoked are accepted.
#[derive(Debug)]
pub struct FakeIdentityService {
    user: Mutex<User>,
    access_token: Mutex<Option<String>>,
    issued: AtomicU64,
    valid_csrf: Mutex<HashSet<String>>,
    reject_all_csrf: AtomicBool,
    pub csrf_fetches: AtomicU64,
    pub mutation_attempts: AtomicU64,
    pub logout_calls: AtomicU64,
    pub refresh_calls: AtomicU64,
    hold_refresh: AtomicBool,
    pub refresh_entered: Notify,
    pub refresh_release: Notify,
}

impl FakeIdentityService {
    pub fn new(role: Role) -> Self {
        Self {
            user: Mutex::new(User {
                id: Uuid::new_v4(),
                email: "staff@agency.test".into(),
                full_name: "Staff Member".into(),
                role,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                last_login_at: None,
            }),
            access_token: Mutex::new(None),
            issued: AtomicU64::new(0),
            valid_csrf: Mutex::new(HashSet::new()),
            reject_all_csrf: AtomicBool::new(false),
            csrf_fetches: AtomicU64::new(0),
            mutation_attempts: AtomicU64::new(0),
            logout_calls: AtomicU64::new(0),
            refresh_calls: AtomicU64::new(0),
            hold_refresh: AtomicBool::new(false),
            refresh_entered: Notify::new(),
            refresh_release: Notify::new(),
        }
    }

    /// Issue this access token on the next login instead of a generated one.
    pub fn issue_access_token(&self, token: impl Into<String>) {
        *self.access_token.lock().unwrap() = Some(token.into());
    }

    /// Forget every anti-forgery token issued so far (server restart).
    pub fn revoke_csrf_tokens(&self) {
        self.valid_csrf.lock().unwrap().clear();
    }

    /// Reject every anti-forgery token, including fresh ones.
    pub fn reject_all_csrf(&self, reject: bool) {
        self.reject_all_csrf.store(reject, Ordering::SeqCst);
    }

    /// Make the next refresh wait for `refresh_release`.
    pub fn hold_next_refresh(&self) {
        self.hold_refresh.store(true, Ordering::SeqCst);
    }

    /// A state-changing data endpoint (`POST /bookings`).
    pub async fn create_booking(&self, auth: &RequestAuth) -> AppResult<String> {
        self.mutation_attempts.fetch_add(1, Ordering::SeqCst);
        if auth.bearer.is_none() {
            return Err(AppError::session_expired("Missing bearer token"));
        }
        self.check_csrf(auth)?;
        Ok(format!("booking-{}", self.next()))
    }

    fn check_csrf(&self, auth: &RequestAuth) -> AppResult<()> {
        let accepted = !self.reject_all_csrf.load(Ordering::SeqCst)
            && auth
                .csrf
                .as_ref()
                .is_some_and(|token| self.valid_csrf.lock().unwrap().contains(token));
        if accepted {
            Ok(())
        } else {
            Err(AppError::forgery_token_invalid("Invalid CSRF token"))
        }
    }

    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl IdentityApi for FakeIdentityService {
    async fn login(&self, request: &LoginRequest, auth: &RequestAuth) -> AppResult<AuthResponse> {
        self.check_csrf(auth)?;
        if request.password != "correct-password" {
            return Err(AppError::invalid_credentials("Invalid email or password"));
        }
        let n = self.next();
        let access_token = self
            .access_token
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("access-{n}"));
        Ok(AuthResponse {
            user: self.user.lock().unwrap().clone(),
            access_token: Some(access_token),
            refresh_token: Some(format!("refresh-{n}")),
        })
    }

    async fn register(&self, request: &RegisterRequest, auth: &RequestAuth) -> AppResult<User> {
        self.check_csrf(auth)?;
        let mut user = self.user.lock().unwrap().clone();
        user.id = Uuid::new_v4();
        user.email = request.email.clone();
        user.full_name = request.full_name.clone();
        user.role = request.role;
        Ok(user)
    }

    async fn current_user(&self, auth: &RequestAuth) -> AppResult<User> {
        match auth.bearer {
            Some(_) => Ok(self.user.lock().unwrap().clone()),
            None => Err(AppError::session_expired("Missing bearer token")),
        }
    }

    async fn refresh(
        &self,
        refresh_token: Option<&str>,
        auth: &RequestAuth,
    ) -> AppResult<RefreshResponse> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_refresh.swap(false, Ordering::SeqCst) {
            self.refresh_entered.notify_one();
            self.refresh_release.notified().await;
        }
        self.check_csrf(auth)?;
        if refresh_token.is_none() {
            return Err(AppError::session_expired("Missing refresh token"));
        }
        Ok(RefreshResponse {
            access_token: format!("access-{}", self.next()),
            refresh_token: None,
        })
    }

    async fn logout(&self, auth: &RequestAuth) -> AppResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.check_csrf(auth)
    }

    async fn csrf_token(&self) -> AppResult<CsrfTokenResponse> {
        self.csrf_fetches.fetch_add(1, Ordering::SeqCst);
        let token = format!("csrf-{}", self.next());
        self.valid_csrf.lock().unwrap().insert(token.clone());
        Ok(CsrfTokenResponse {
            csrf_token: token,
            expires_in: 3600,
        })
    }
}

/// Test client context
pub struct TestApp {
    /// The fake identity service
    pub api: Arc<FakeIdentityService>,
    /// Wall clock the session reads
    pub clock: Arc<ManualClock>,
    /// The client-side store
    pub store: MemoryStore,
    /// The wired session components
    pub context: SessionContext,
}

impl TestApp {
    /// Create a new test client for a user with `role`
    pub fn new(role: Role) -> Self {
        let api = Arc::new(FakeIdentityService::new(role));
        let clock = Arc::new(ManualClock::starting_now());
        let store = MemoryStore::new();
        let context = SessionContext::new(
            ClientConfig::default(),
            api.clone(),
            StoreManager::from_provider(Arc::new(store.clone()), StoreKeys::default()),
            clock.clone(),
        )
        .expect("Failed to build session context");

        Self {
            api,
            clock,
            store,
            context,
        }
    }

    /// Log in with the correct password.
    ///
    /// Also nudges tokio time past the timer start so that later sleeps of
    /// whole check intervals land just after a check, never on it.
    pub async fn login(&self) -> AuthorizedUser {
        let user = self
            .context
            .orchestrator()
            .login(LoginRequest::new("staff@agency.test", "correct-password"))
            .await
            .expect("Login failed");
        tokio::time::sleep(Duration::from_millis(10)).await;
        user
    }

    /// Let time pass without activity.
    ///
    /// The wall clock and tokio time move together, one check interval at
    /// a time, so the refresh timer and the idle check both see the wall
    /// clock they would see in a running client.
    pub async fn idle(&self, duration: Duration) {
        let step = self.context.config().session.activity_check_interval();
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            let tick = step.min(duration - elapsed);
            self.clock.advance(tick);
            tokio::time::sleep(tick).await;
            elapsed += tick;
        }
    }

    /// Number of background refreshes the service has answered.
    pub fn refreshes(&self) -> u64 {
        self.api.refresh_calls.load(Ordering::SeqCst)
    }
}
