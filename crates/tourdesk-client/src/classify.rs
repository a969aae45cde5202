//! Maps identity API failures onto the session core's error kinds.

use reqwest::StatusCode;
use serde::Deserialize;

use tourdesk_core::error::{AppError, ErrorKind};

use crate::endpoint::Endpoint;

/// Error body shape used by the identity API. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn mentions_csrf(&self) -> bool {
        [&self.code, &self.error]
            .into_iter()
            .flatten()
            .any(|value| value.to_ascii_lowercase().contains("csrf"))
    }

    fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Classify a non-success response.
///
/// - 401 on login is a credential rejection; anywhere else the session is gone.
/// - 403 naming the CSRF token is a forgery rejection; otherwise a permission denial.
/// - A registration rejected as malformed or conflicting is a credential rejection.
/// - 408, 429 and 5xx mean the service is unavailable.
pub fn classify_response(endpoint: Endpoint, status: StatusCode, body: &str) -> AppError {
    let body = ErrorBody::parse(body);

    let (kind, fallback) = match status {
        StatusCode::UNAUTHORIZED if endpoint == Endpoint::Login => {
            (ErrorKind::InvalidCredentials, "Invalid email or password")
        }
        StatusCode::UNAUTHORIZED => (
            ErrorKind::SessionExpired,
            "Your session has expired. Please log in again.",
        ),
        StatusCode::FORBIDDEN if body.mentions_csrf() => {
            (ErrorKind::ForgeryTokenInvalid, "Invalid CSRF token")
        }
        StatusCode::FORBIDDEN => (
            ErrorKind::PermissionDenied,
            "You do not have permission to perform this action",
        ),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
            if endpoint == Endpoint::Register =>
        {
            (ErrorKind::InvalidCredentials, "Registration was rejected")
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            (ErrorKind::Validation, "The request was rejected")
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => (
            ErrorKind::ServiceUnavailable,
            "The server is busy. Please try again.",
        ),
        s if s.is_server_error() => (
            ErrorKind::ServiceUnavailable,
            "Unable to reach the server. Please try again.",
        ),
        _ => (ErrorKind::Internal, "Unexpected response from the server"),
    };

    AppError::new(kind, body.message_or(fallback))
}

/// Classify a transport failure. Anything that kept the request from
/// getting an answer means the service is unavailable.
pub fn classify_transport(endpoint: Endpoint, error: reqwest::Error) -> AppError {
    if error.is_decode() {
        return AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed response from {endpoint}"),
            error,
        );
    }

    let message = if error.is_timeout() {
        format!("{endpoint} timed out")
    } else if error.is_connect() {
        format!("Could not connect for {endpoint}")
    } else {
        format!("{endpoint} failed")
    };
    AppError::with_source(ErrorKind::ServiceUnavailable, message, error)
}
