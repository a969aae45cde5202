//! # tourdesk-entity
//!
//! Domain models for the TourDesk session core: roles and users as the
//! identity API reports them, the persisted token records, and the
//! request/response bodies exchanged with the identity API.

pub mod auth;
pub mod session;
pub mod user;
