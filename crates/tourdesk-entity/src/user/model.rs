//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{Department, Role};

/// A staff account as reported by the identity API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email address.
    pub email: String,
    /// Human-readable full name.
    pub full_name: String,
    /// User role (RBAC).
    pub role: Role,
    /// Whether the account may sign in.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Department label derived from the role.
    pub fn department(&self) -> Department {
        self.role.department()
    }
}

fn default_active() -> bool {
    true
}

/// A user whose identity was confirmed by the identity API.
///
/// Only values returned by the identity API (login, registration, or the
/// current-user lookup) are wrapped in this type. Authorization decisions
/// accept nothing else; in particular, claims decoded from a token on the
/// client cannot be turned into an `AuthorizedUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedUser(User);

impl AuthorizedUser {
    /// Wrap a user returned by the identity API.
    pub fn from_identity_api(user: User) -> Self {
        Self(user)
    }

    /// The underlying user record.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// The user's ID.
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    /// The user's role.
    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Consume the wrapper.
    pub fn into_user(self) -> User {
        self.0
    }
}
