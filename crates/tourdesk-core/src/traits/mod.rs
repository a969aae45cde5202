//! Core traits defined in `tourdesk-core` and implemented by other crates.

pub mod clock;
pub mod key_value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key_value::KeyValueStore;
