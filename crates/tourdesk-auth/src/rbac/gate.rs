//! Authorization gate: decides whether a view or action may proceed.

use serde::Serialize;

use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_entity::user::{AuthorizedUser, Role};

use super::policies::{Capability, PermissionMatrix};

/// Where a denied caller is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// The login screen (no session).
    Login,
    /// The access-denied screen (authenticated, but not allowed).
    Unauthorized,
}

/// Why access was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DenyReason {
    /// No authenticated user.
    NotAuthenticated,
    /// The user's role is not in the allow-list.
    RoleNotAllowed { role: Role },
    /// The user's role lacks the capability.
    MissingCapability { role: Role, capability: Capability },
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Render the guarded content.
    Allow,
    /// Redirect instead.
    Deny {
        redirect: RedirectTarget,
        reason: DenyReason,
    },
}

impl GateDecision {
    /// Whether the guarded content may be rendered.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect target of a denial.
    pub fn redirect(&self) -> Option<RedirectTarget> {
        match self {
            Self::Allow => None,
            Self::Deny { redirect, .. } => Some(*redirect),
        }
    }

    fn deny(redirect: RedirectTarget, reason: DenyReason) -> Self {
        Self::Deny { redirect, reason }
    }
}

/// Enforces capability and role requirements against the current user.
///
/// Only an [`AuthorizedUser`] is accepted, so a decision can never be
/// based on claims decoded from a token on the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Creates a new gate.
    pub fn new() -> Self {
        Self
    }

    /// Decide access. Checks run in order: authentication, role allow-list,
    /// then capability.
    pub fn decide(
        &self,
        user: Option<&AuthorizedUser>,
        capability: Option<Capability>,
        roles: Option<&[Role]>,
    ) -> GateDecision {
        let Some(user) = user else {
            return GateDecision::deny(RedirectTarget::Login, DenyReason::NotAuthenticated);
        };
        let role = user.role();

        if let Some(allowed) = roles {
            if !allowed.contains(&role) {
                return GateDecision::deny(
                    RedirectTarget::Unauthorized,
                    DenyReason::RoleNotAllowed { role },
                );
            }
        }

        if let Some(capability) = capability {
            if !PermissionMatrix::has_capability(role, capability) {
                return GateDecision::deny(
                    RedirectTarget::Unauthorized,
                    DenyReason::MissingCapability { role, capability },
                );
            }
        }

        GateDecision::Allow
    }

    /// Checks a capability for an action (rather than a view).
    ///
    /// Returns `Err(AppError::permission_denied)` when the user is missing
    /// or lacks the capability.
    pub fn require(&self, user: Option<&AuthorizedUser>, capability: Capability) -> AppResult<()> {
        match self.decide(user, Some(capability), None) {
            GateDecision::Allow => Ok(()),
            GateDecision::Deny {
                reason: DenyReason::NotAuthenticated,
                ..
            } => Err(AppError::permission_denied(format!(
                "Sign in to perform '{capability}'"
            ))),
            GateDecision::Deny { .. } => Err(AppError::permission_denied(format!(
                "Your role does not have permission '{capability}'"
            ))),
        }
    }
}
