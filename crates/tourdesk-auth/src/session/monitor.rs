//! Idle-session monitor: activity extends the session, inactivity ends it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use tourdesk_core::events::{DomainEvent, SessionEvent};

use crate::token::TokenStore;

/// User interactions that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    /// Mouse or pen press.
    PointerDown,
    /// Key press.
    KeyDown,
    /// Scrolling.
    Scroll,
    /// Touch start.
    TouchStart,
}

/// Result of a periodic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCheck {
    /// Not monitoring (no session).
    Detached,
    /// Plenty of time left.
    Active { remaining: Duration },
    /// Inside the warning window. `first` is set on the check that opened it.
    Warning { remaining: Duration, first: bool },
    /// Nothing left; the session must end.
    Expired,
}

/// Tracks user activity against the token expiry.
///
/// While attached, every [`ActivityEvent`] pushes the expiry forward.
/// The orchestrator runs [`check`](Self::check) periodically and ends the
/// session on [`MonitorCheck::Expired`].
#[derive(Debug)]
pub struct ActivityMonitor {
    tokens: Arc<TokenStore>,
    warning_window: Duration,
    attached: AtomicBool,
    warning: watch::Sender<bool>,
    events: broadcast::Sender<DomainEvent>,
}

impl ActivityMonitor {
    /// Creates a detached monitor.
    pub fn new(
        tokens: Arc<TokenStore>,
        warning_window: Duration,
        events: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            tokens,
            warning_window,
            attached: AtomicBool::new(false),
            warning: watch::Sender::new(false),
            events,
        }
    }

    /// Whether activity is currently being tracked.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Whether the expiration warning is showing.
    pub fn warning_visible(&self) -> bool {
        *self.warning.borrow()
    }

    /// Watch the expiration warning flag.
    pub fn subscribe_warning(&self) -> watch::Receiver<bool> {
        self.warning.subscribe()
    }

    /// Record a user interaction. Ignored while detached.
    ///
    /// Returns whether the session expiry moved.
    pub fn record_activity(&self, event: ActivityEvent) -> bool {
        if !self.is_attached() {
            return false;
        }
        let extended = self.tokens.extend();
        if extended {
            debug!(?event, "Activity extended session");
        }
        self.settle_warning();
        extended
    }

    /// The "stay logged in" action of the expiration warning.
    pub fn stay_logged_in(&self) -> bool {
        if !self.is_attached() {
            return false;
        }
        let extended = self.tokens.extend();
        info!(extended, "User chose to stay logged in");
        self.settle_warning();
        extended
    }

    /// Compare the remaining time with the warning window.
    pub fn check(&self) -> MonitorCheck {
        if !self.is_attached() {
            return MonitorCheck::Detached;
        }

        let remaining = self.tokens.remaining_time();
        if remaining.is_zero() {
            return MonitorCheck::Expired;
        }

        if remaining < self.warning_window {
            let first = !self.warning.send_replace(true);
            if first {
                info!(
                    remaining_secs = remaining.as_secs(),
                    "Session about to expire"
                );
                self.emit(SessionEvent::ExpiryWarning {
                    remaining_seconds: remaining.as_secs(),
                });
            }
            MonitorCheck::Warning { remaining, first }
        } else {
            self.clear_warning();
            MonitorCheck::Active { remaining }
        }
    }

    pub(crate) fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
    }

    pub(crate) fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
        self.clear_warning();
    }

    /// Drop the warning once the session is back outside the window.
    fn settle_warning(&self) {
        if self.tokens.remaining_time() >= self.warning_window {
            self.clear_warning();
        }
    }

    fn clear_warning(&self) {
        if self.warning.send_replace(false) {
            self.emit(SessionEvent::WarningCleared);
        }
    }

    fn emit(&self, payload: SessionEvent) {
        let _ = self.events.send(DomainEvent::new(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csrf::CsrfManager;
    use crate::testing::StubApi;
    use tourdesk_core::config::{CsrfConfig, SessionConfig};
    use tourdesk_core::traits::ManualClock;
    use tourdesk_store::StoreKeys;
    use tourdesk_store::memory::MemoryStore;

    const MINUTE: Duration = Duration::from_secs(60);

    fn monitor() -> (ActivityMonitor, Arc<TokenStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::starting_now());
        let csrf = Arc::new(CsrfManager::new(
            Arc::new(StubApi::new()),
            store.clone(),
            StoreKeys::default(),
            clock.clone(),
            &CsrfConfig::default(),
        ));
        let tokens = Arc::new(TokenStore::new(
            store,
            StoreKeys::default(),
            clock.clone(),
            &SessionConfig::default(),
            csrf,
        ));
        let (events, _) = broadcast::channel(16);
        let monitor = ActivityMonitor::new(tokens.clone(), 5 * MINUTE, events);
        (monitor, tokens, clock)
    }

    #[test]
    fn test_detached_monitor_ignores_activity() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        clock.advance(10 * MINUTE);

        assert!(!monitor.record_activity(ActivityEvent::KeyDown));
        assert_eq!(tokens.remaining_time(), 50 * MINUTE);
        assert_eq!(monitor.check(), MonitorCheck::Detached);
    }

    #[test]
    fn test_activity_extends_session() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        monitor.attach();
        clock.advance(10 * MINUTE);

        assert!(monitor.record_activity(ActivityEvent::PointerDown));
        assert_eq!(tokens.remaining_time(), 60 * MINUTE);
    }

    #[test]
    fn test_warning_is_reported_first_once() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        monitor.attach();

        clock.advance(56 * MINUTE);
        assert_eq!(
            monitor.check(),
            MonitorCheck::Warning {
                remaining: 4 * MINUTE,
                first: true
            }
        );
        assert!(monitor.warning_visible());

        clock.advance(MINUTE);
        assert_eq!(
            monitor.check(),
            MonitorCheck::Warning {
                remaining: 3 * MINUTE,
                first: false
            }
        );
    }

    #[test]
    fn test_stay_logged_in_clears_warning() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        monitor.attach();
        clock.advance(57 * MINUTE);
        monitor.check();

        assert!(monitor.stay_logged_in());
        assert!(!monitor.warning_visible());
        assert!(tokens.remaining_time() > 5 * MINUTE);
        assert!(matches!(monitor.check(), MonitorCheck::Active { .. }));
    }

    #[test]
    fn test_expired_when_nothing_remains() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        monitor.attach();
        clock.advance(60 * MINUTE);

        assert_eq!(monitor.check(), MonitorCheck::Expired);
    }

    #[test]
    fn test_detach_clears_warning() {
        let (monitor, tokens, clock) = monitor();
        tokens.set_tokens("access-a", None).unwrap();
        monitor.attach();
        clock.advance(58 * MINUTE);
        monitor.check();

        monitor.detach();
        assert!(!monitor.warning_visible());
        assert!(!monitor.is_attached());
    }
}
