//! Identity API endpoints.

use std::fmt;

use tourdesk_core::types::HttpMethod;

/// An identity API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /auth/login`
    Login,
    /// `POST /auth/register`
    Register,
    /// `GET /auth/me`
    CurrentUser,
    /// `POST /auth/refresh`
    Refresh,
    /// `POST /auth/logout`
    Logout,
    /// `GET /api/csrf-token`
    CsrfToken,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::CurrentUser => "/auth/me",
            Self::Refresh => "/auth/refresh",
            Self::Logout => "/auth/logout",
            Self::CsrfToken => "/api/csrf-token",
        }
    }

    /// HTTP method of the endpoint.
    pub fn method(&self) -> HttpMethod {
        match self {
            Self::CurrentUser | Self::CsrfToken => HttpMethod::Get,
            Self::Login | Self::Register | Self::Refresh | Self::Logout => HttpMethod::Post,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
