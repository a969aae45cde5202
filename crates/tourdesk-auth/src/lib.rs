//! # tourdesk-auth
//!
//! Client-side authentication and authorization for the TourDesk
//! back office.
//!
//! ## Modules
//!
//! - `rbac`: permission matrix, authorization gate, route requirements
//! - `token`: token persistence with lazy expiry, display-claims decoding
//! - `csrf`: anti-forgery token cache with single-retry replay
//! - `api`: the `IdentityApi` seam implemented by `tourdesk-client`
//! - `session`: orchestrator, idle monitor, timers, published state
//! - `context`: per-client wiring of all of the above

pub mod api;
pub mod context;
pub mod csrf;
pub mod rbac;
pub mod session;
pub mod token;

#[cfg(test)]
mod testing;

pub use api::{IdentityApi, RequestAuth};
pub use context::SessionContext;
pub use csrf::CsrfManager;
pub use rbac::{AuthorizationGate, Capabilities, Capability, GateDecision, PermissionMatrix};
pub use session::{ActivityEvent, ActivityMonitor, AuthOrchestrator, AuthState, MonitorCheck};
pub use token::{DisplayClaims, TokenStore};
