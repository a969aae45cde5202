//! Events emitted by the session core.
//!
//! Events are broadcast to every subscriber (UI notices, audit hooks)
//! and never carry token material.

pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use session::{SessionEndReason, SessionEvent};

/// Wrapper for session events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: SessionEvent,
}

impl DomainEvent {
    /// Create a new event stamped with the current time.
    pub fn new(payload: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
