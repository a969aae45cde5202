//! Forgery-protection (CSRF) token management.

pub mod manager;

pub use manager::{CsrfManager, CsrfState};
