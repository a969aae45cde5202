//! Route requirements for the protected back-office views.

use tourdesk_entity::user::{AuthorizedUser, Role};

use super::gate::{AuthorizationGate, GateDecision};
use super::policies::Capability;

/// What a view requires beyond an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Path prefix the requirement applies to.
    pub path: &'static str,
    /// Capability the user's role must hold.
    pub capability: Option<Capability>,
    /// Roles admitted regardless of other roles' capabilities.
    pub allowed_roles: Option<&'static [Role]>,
}

const SETTINGS_ROLES: &[Role] = &[Role::SuperAdmin, Role::WebDeveloper];

const fn route(path: &'static str, capability: Capability) -> RouteRequirement {
    RouteRequirement {
        path,
        capability: Some(capability),
        allowed_roles: None,
    }
}

static ROUTES: &[RouteRequirement] = &[
    route("/dashboard", Capability::AccessDashboard),
    route("/bookings", Capability::AccessBookings),
    route("/tours", Capability::AccessTours),
    route("/tours/new", Capability::CreateTours),
    route("/customers", Capability::AccessCustomers),
    route("/visa", Capability::AccessVisaApplications),
    route("/inquiries", Capability::AccessInquiries),
    route("/tasks", Capability::AccessTasks),
    route("/users", Capability::AccessUserManagement),
    route("/users/new", Capability::RegisterUsers),
    RouteRequirement {
        path: "/settings",
        capability: Some(Capability::AccessSettings),
        allowed_roles: Some(SETTINGS_ROLES),
    },
    route("/reports", Capability::AccessReports),
];

/// The requirement table for every protected view.
pub fn route_requirements() -> &'static [RouteRequirement] {
    ROUTES
}

/// The most specific requirement covering `path`, matched on whole
/// path segments (`/tours/new/` matches `/tours/new`, `/toursx` matches
/// nothing).
pub fn requirement_for(path: &str) -> Option<&'static RouteRequirement> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    ROUTES
        .iter()
        .filter(|r| {
            path == r.path
                || path
                    .strip_prefix(r.path)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|r| r.path.len())
}

/// Gate decision for navigating to `path`. Paths without an entry only
/// require an authenticated user.
pub fn authorize_route(
    gate: &AuthorizationGate,
    user: Option<&AuthorizedUser>,
    path: &str,
) -> GateDecision {
    match requirement_for(path) {
        Some(requirement) => gate.decide(user, requirement.capability, requirement.allowed_roles),
        None => gate.decide(user, None, None),
    }
}
