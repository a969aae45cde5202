//! # tourdesk-core
//!
//! Core crate for the TourDesk session core. Contains the client-side
//! storage and clock traits, configuration schemas, session events,
//! tracing setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TourDesk crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
