//! # tourdesk-store
//!
//! Persistent client-side key-value stores for the TourDesk session core.
//! Supports two modes:
//!
//! - **memory**: in-process map using [dashmap](https://crates.io/crates/dashmap),
//!   lost when the process exits
//! - **file**: a JSON document on disk, surviving restarts
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "file")]
pub mod file;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use keys::StoreKeys;
pub use provider::StoreManager;
