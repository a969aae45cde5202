//! Role-based access control: the permission matrix, the authorization
//! gate, and the route requirement table.

pub mod gate;
pub mod policies;
pub mod routes;

pub use gate::{AuthorizationGate, DenyReason, GateDecision, RedirectTarget};
pub use policies::{Capabilities, Capability, PermissionMatrix};
pub use routes::{RouteRequirement, authorize_route, requirement_for, route_requirements};
