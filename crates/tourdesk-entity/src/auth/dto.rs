//! Identity API wire types. Field names follow the API's camelCase.

use serde::{Deserialize, Serialize};

use crate::user::{Role, User};

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email address.
    pub email: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
}

impl LoginRequest {
    /// Build a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email address of the new account.
    pub email: String,
    /// Initial password of the new account.
    pub password: String,
    /// Full name of the new account holder.
    pub full_name: String,
    /// Role assigned to the new account.
    pub role: Role,
    /// Optional contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Response of login and registration: the user plus issued tokens.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The authenticated (or newly created) user.
    pub user: User,
    /// Access token, when issued in the body rather than a cookie.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, when issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Response of `POST /auth/refresh`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// The new access token.
    pub access_token: String,
    /// A rotated refresh token, when the server rotates them.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Response of `GET /api/csrf-token`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    /// Opaque anti-forgery token.
    pub csrf_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: u64,
}

impl std::fmt::Debug for CsrfTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokenResponse")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
