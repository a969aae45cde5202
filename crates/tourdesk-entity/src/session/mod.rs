//! Client-side session records.

pub mod token;

pub use token::{CsrfTokenRecord, TokenRecord};
