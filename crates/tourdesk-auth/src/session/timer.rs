//! Cancellable periodic tasks.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// What a tick asks of its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Keep ticking.
    Continue,
    /// Exit the loop.
    Stop,
}

/// Handle to a periodic task. Stopping or dropping the handle cancels it.
///
/// Cancellation is observed between ticks: a tick that is already running
/// completes, so a tick may safely stop its own timer.
#[derive(Debug)]
pub struct TimerHandle {
    name: &'static str,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn a loop calling `tick` every `period`, first after one period.
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickControl> + Send + 'static,
    {
        let (cancel, mut cancelled) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = cancelled.changed() => {
                        if changed.is_err() || *cancelled.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if tick().await == TickControl::Stop {
                            break;
                        }
                    }
                }
            }

            debug!(timer = name, "Timer stopped");
        });

        debug!(timer = name, period_secs = period.as_secs(), "Timer started");
        Self { name, cancel, task }
    }

    /// The timer's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the timer.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}
