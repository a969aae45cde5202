//! Published authentication state.

use serde::Serialize;

use tourdesk_entity::user::AuthorizedUser;

/// Authentication state as observed by views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AuthState {
    /// Startup: the cached session has not been checked yet.
    Initializing,
    /// No session. `notice` explains why, when there is something to say.
    Unauthenticated { notice: Option<String> },
    /// A login request is in flight.
    Authenticating,
    /// A confirmed user is signed in.
    Authenticated(AuthorizedUser),
}

impl AuthState {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&AuthorizedUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// The notice attached to an unauthenticated state.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated { notice } => notice.as_deref(),
            _ => None,
        }
    }

    /// Whether the state is still settling (startup or login in flight).
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Initializing | Self::Authenticating)
    }
}
