//! User domain entities.

pub mod model;
pub mod role;

pub use model::{AuthorizedUser, User};
pub use role::{Department, Role};
