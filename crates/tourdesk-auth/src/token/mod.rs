//! Session token persistence and display-claims decoding.

pub mod claims;
pub mod store;

pub use claims::{DisplayClaims, decode_claims};
pub use store::TokenStore;
