//! Session lifecycle events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// The user logged out.
    Logout,
    /// The idle monitor found no remaining time.
    IdleTimeout,
    /// A token read or a server 401 showed the session is gone.
    Expired,
    /// The silent background refresh was rejected.
    RefreshFailed,
}

impl SessionEndReason {
    /// User-facing notice for the ended session, if one should be shown.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Logout => None,
            Self::IdleTimeout => Some("Your session has ended due to inactivity."),
            Self::Expired | Self::RefreshFailed => {
                Some("Your session has expired. Please log in again.")
            }
        }
    }
}

/// Events related to the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A user logged in and a session was created.
    LoggedIn {
        /// The user ID.
        user_id: Uuid,
    },
    /// A cached session was confirmed on startup.
    Restored {
        /// The user ID.
        user_id: Uuid,
    },
    /// The session ended.
    Ended {
        /// The user ID, if a user was known.
        user_id: Option<Uuid>,
        /// Why the session ended.
        reason: SessionEndReason,
    },
    /// The access token was silently refreshed.
    Refreshed {
        /// The user ID.
        user_id: Uuid,
    },
    /// The session is about to expire.
    ExpiryWarning {
        /// Seconds left before forced logout.
        remaining_seconds: u64,
    },
    /// The expiration warning was dismissed by activity or "stay logged in".
    WarningCleared,
}
