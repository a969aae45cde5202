//! Core type definitions used across the TourDesk workspace.

pub mod method;

pub use method::HttpMethod;
