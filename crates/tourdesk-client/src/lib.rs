//! # tourdesk-client
//!
//! `reqwest` implementation of [`tourdesk_auth::IdentityApi`]. Attaches the
//! bearer and anti-forgery headers handed over by the session core and
//! classifies failures into [`tourdesk_core::error::ErrorKind`]s.

pub mod classify;
pub mod endpoint;
pub mod http;

pub use endpoint::Endpoint;
pub use http::HttpIdentityApi;
