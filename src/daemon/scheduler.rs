//! One-second periodic driver for the session controller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::timer::{SessionController, TickOutcome};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Calls `tick()` on the shared controller once per period.
pub struct Scheduler {
    controller: Arc<Mutex<SessionController>>,
    period: Duration,
}

impl Scheduler {
    /// Creates a scheduler ticking once per second.
    pub fn new(controller: Arc<Mutex<SessionController>>) -> Self {
        Self::with_period(controller, TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(controller: Arc<Mutex<SessionController>>, period: Duration) -> Self {
        Self { controller, period }
    }

    /// Runs until the task is aborted.
    ///
    /// Late ticks are skipped rather than replayed, so a stalled runtime never
    /// produces a burst of decrements.
    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let mut controller = self.controller.lock().await;
            if !controller.is_running() {
                continue;
            }
            if let TickOutcome::Completed(transition) = controller.tick() {
                debug!(
                    finished = transition.finished.as_str(),
                    next = transition.next.as_str(),
                    "auto-advanced to next session"
                );
            }
        }
    }
}
