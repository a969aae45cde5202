//! Request and response bodies exchanged with the identity API.

pub mod dto;

pub use dto::{AuthResponse, CsrfTokenResponse, LoginRequest, RefreshResponse, RegisterRequest};
