//! The identity API seam.
//!
//! The session core never talks HTTP directly. It calls an [`IdentityApi`]
//! and hands it a [`RequestAuth`] carrying the headers to attach.
//! `tourdesk-client` provides the `reqwest` implementation; tests use
//! in-memory fakes.

use async_trait::async_trait;

use tourdesk_core::result::AppResult;
use tourdesk_entity::auth::{
    AuthResponse, CsrfTokenResponse, LoginRequest, RefreshResponse, RegisterRequest,
};
use tourdesk_entity::user::User;

/// Credentials attached to one outgoing request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestAuth {
    /// Access token for the `Authorization: Bearer` header.
    pub bearer: Option<String>,
    /// Anti-forgery token for state-changing calls.
    pub csrf: Option<String>,
}

impl RequestAuth {
    /// No credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Attach a CSRF token.
    pub fn with_csrf(mut self, csrf: Option<String>) -> Self {
        self.csrf = csrf;
        self
    }

    /// The `Authorization` header value, if a bearer token is present.
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl std::fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuth")
            .field("has_bearer", &self.bearer.is_some())
            .field("has_csrf", &self.csrf.is_some())
            .finish()
    }
}

/// Operations of the remote identity service.
///
/// Implementations classify failures into the session core's error kinds:
/// `InvalidCredentials`, `SessionExpired`, `ForgeryTokenInvalid`,
/// `PermissionDenied` and `ServiceUnavailable`.
#[async_trait]
pub trait IdentityApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest, auth: &RequestAuth) -> AppResult<AuthResponse>;

    /// `POST /auth/register`. Returns the created account.
    async fn register(&self, request: &RegisterRequest, auth: &RequestAuth) -> AppResult<User>;

    /// `GET /auth/me`.
    async fn current_user(&self, auth: &RequestAuth) -> AppResult<User>;

    /// `POST /auth/refresh`.
    async fn refresh(
        &self,
        refresh_token: Option<&str>,
        auth: &RequestAuth,
    ) -> AppResult<RefreshResponse>;

    /// `POST /auth/logout`.
    async fn logout(&self, auth: &RequestAuth) -> AppResult<()>;

    /// `GET /api/csrf-token`.
    async fn csrf_token(&self) -> AppResult<CsrfTokenResponse>;
}
