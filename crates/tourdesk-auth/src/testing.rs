//! In-memory identity API used by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_entity::auth::{
    AuthResponse, CsrfTokenResponse, LoginRequest, RefreshResponse, RegisterRequest,
};
use tourdesk_entity::user::{Role, User};

use crate::api::{IdentityApi, RequestAuth};

pub fn sample_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: "staff@agency.test".into(),
        full_name: "Staff Member".into(),
        role,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        last_login_at: None,
    }
}

/// Answers every call successfully unless a failure is queued for it.
#[derive(Debug)]
pub struct StubApi {
    pub user: Mutex<User>,
    pub login_error: Mutex<Option<AppError>>,
    pub me_error: Mutex<Option<AppError>>,
    pub refresh_error: Mutex<Option<AppError>>,
    pub calls: Mutex<Vec<(&'static str, RequestAuth)>>,
    issued: AtomicU64,
}

impl StubApi {
    pub fn new() -> Self {
        Self::with_role(Role::SuperAdmin)
    }

    pub fn with_role(role: Role) -> Self {
        Self {
            user: Mutex::new(sample_user(role)),
            login_error: Mutex::new(None),
            me_error: Mutex::new(None),
            refresh_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn calls_to(&self, name: &str) -> Vec<RequestAuth> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| *call == name)
            .map(|(_, auth)| auth.clone())
            .collect()
    }

    fn record(&self, name: &'static str, auth: &RequestAuth) {
        self.calls.lock().unwrap().push((name, auth.clone()));
    }

    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl IdentityApi for StubApi {
    async fn login(&self, _request: &LoginRequest, auth: &RequestAuth) -> AppResult<AuthResponse> {
        self.record("login", auth);
        if let Some(e) = self.login_error.lock().unwrap().take() {
            return Err(e);
        }
        let n = self.next();
        Ok(AuthResponse {
            user: self.user.lock().unwrap().clone(),
            access_token: Some(format!("access-{n}")),
            refresh_token: Some(format!("refresh-{n}")),
        })
    }

    async fn register(&self, request: &RegisterRequest, auth: &RequestAuth) -> AppResult<User> {
        self.record("register", auth);
        let mut user = sample_user(request.role);
        user.email = request.email.clone();
        user.full_name = request.full_name.clone();
        Ok(user)
    }

    async fn current_user(&self, auth: &RequestAuth) -> AppResult<User> {
        self.record("me", auth);
        if let Some(e) = self.me_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.user.lock().unwrap().clone())
    }

    async fn refresh(
        &self,
        _refresh_token: Option<&str>,
        auth: &RequestAuth,
    ) -> AppResult<RefreshResponse> {
        self.record("refresh", auth);
        if let Some(e) = self.refresh_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(RefreshResponse {
            access_token: format!("access-{}", self.next()),
            refresh_token: None,
        })
    }

    async fn logout(&self, auth: &RequestAuth) -> AppResult<()> {
        self.record("logout", auth);
        Ok(())
    }

    async fn csrf_token(&self) -> AppResult<CsrfTokenResponse> {
        Ok(CsrfTokenResponse {
            csrf_token: format!("csrf-{}", self.next()),
            expires_in: 3600,
        })
    }
}
