//! Session lifecycle: published state, the orchestrator driving login,
//! refresh and logout, the idle monitor, and the timers behind them.

pub mod monitor;
pub mod orchestrator;
pub mod state;
pub mod timer;

pub use monitor::{ActivityEvent, ActivityMonitor, MonitorCheck};
pub use orchestrator::AuthOrchestrator;
pub use state::AuthState;
pub use timer::{TickControl, TimerHandle};
