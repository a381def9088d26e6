//! Session controller for the Timebox tracker.
//!
//! This module provides the core state machine:
//! - Mode transitions (Focus → Break/LongBreak → Focus)
//! - Countdown progression, one tick per second
//! - Completion bookkeeping (focus counter, session records)
//! - Event emission for logging and notifications
//!
//! The controller never performs I/O itself. Every state change is pushed
//! onto an event channel; the dispatcher turns completion events into log
//! writes and notifications on its own task.

use tokio::sync::mpsc;
use tracing::debug;

use crate::notification::{BREAK_OVER_MESSAGE, FOCUS_COMPLETE_MESSAGE};
use crate::types::{SessionConfig, SessionMode, SessionRecord, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A full-length countdown began
    SessionStarted {
        /// Mode now counting down
        mode: SessionMode,
        /// Length of the session in seconds
        duration_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A focus session finished (naturally or skipped)
    FocusCompleted {
        /// Record to append to the session log
        record: SessionRecord,
        /// Focus sessions completed so far
        completed_focus_sessions: u32,
        /// Break mode that follows
        next_mode: SessionMode,
    },
    /// A break finished (naturally or skipped)
    BreakCompleted {
        /// Which break ended
        mode: SessionMode,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds at the time of the pause
        remaining_seconds: u32,
    },
    /// Countdown resumed
    Resumed {
        /// Remaining seconds at the time of the resume
        remaining_seconds: u32,
    },
    /// Timer returned to idle Focus
    Reset,
}

impl TimerEvent {
    /// Returns the user alert for session-boundary events.
    pub fn notification_message(&self) -> Option<&'static str> {
        match self {
            TimerEvent::FocusCompleted { .. } => Some(FOCUS_COMPLETE_MESSAGE),
            TimerEvent::BreakCompleted { .. } => Some(BREAK_OVER_MESSAGE),
            _ => None,
        }
    }
}

// ============================================================================
// Transition / TickOutcome
// ============================================================================

/// A completed session and the mode that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode that just completed
    pub finished: SessionMode,
    /// Mode now counting down
    pub next: SessionMode,
}

/// Result of a single `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; nothing changed
    Idle,
    /// The countdown moved one second closer to zero
    Counted {
        /// Remaining seconds after the decrement
        remaining_seconds: u32,
    },
    /// The countdown had reached zero and the completion transition fired
    Completed(Transition),
}

// ============================================================================
// SessionController
// ============================================================================

/// Owns the timer state and drives the Focus/Break cycle.
pub struct SessionController {
    /// Live countdown state
    state: TimerState,
    /// Configuration read at every session start
    config: SessionConfig,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl SessionController {
    /// Creates a controller in the idle Focus state.
    ///
    /// The configuration is clamped into its allowed range.
    pub fn new(config: SessionConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: TimerState::new(),
            config: config.sanitized(),
            event_tx,
        }
    }

    /// Replaces the configuration.
    ///
    /// The running countdown is untouched; the new values apply from the next
    /// session start.
    pub fn update_config(&mut self, config: SessionConfig) {
        self.config = config.sanitized();
        debug!(config = ?self.config, "configuration updated");
    }

    /// Begins a full-length countdown for the current mode.
    ///
    /// Starting while already running restarts the current mode from its full
    /// duration.
    pub fn start(&mut self) {
        self.begin_session(self.state.mode);
    }

    /// Like [`start`](Self::start), but leaves a running countdown alone.
    ///
    /// Returns false if the timer was already running.
    pub fn start_if_idle(&mut self) -> bool {
        if self.state.running {
            return false;
        }
        self.start();
        true
    }

    /// Pauses the countdown. No-op if already paused.
    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.pause();
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Resumes a paused countdown.
    ///
    /// Does nothing when no time is left. Returns true if the timer is
    /// running afterwards.
    pub fn resume(&mut self) -> bool {
        if self.state.running {
            return true;
        }
        if !self.state.resume() {
            return false;
        }
        self.emit(TimerEvent::Resumed {
            remaining_seconds: self.state.remaining_seconds,
        });
        true
    }

    /// Returns to Focus with nothing counted down and the timer stopped.
    ///
    /// The completed focus counter is preserved.
    pub fn reset(&mut self) {
        self.state.reset();
        self.emit(TimerEvent::Reset);
    }

    /// Completes the current session immediately.
    ///
    /// A skipped focus session counts as completed and is logged.
    pub fn skip(&mut self) -> Transition {
        self.state.pause();
        self.complete()
    }

    /// Advances the countdown by one second.
    ///
    /// When a running countdown is already at zero, this call fires the
    /// completion transition instead of decrementing.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_expired() {
            return TickOutcome::Completed(self.complete());
        }
        if !self.state.decrement() {
            return TickOutcome::Idle;
        }
        let remaining_seconds = self.state.remaining_seconds;
        self.emit(TimerEvent::Tick { remaining_seconds });
        TickOutcome::Counted { remaining_seconds }
    }

    /// Returns the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current mode.
    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    /// Returns true if the countdown is decrementing.
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Returns the number of completed focus sessions.
    pub fn completed_focus_sessions(&self) -> u32 {
        self.state.completed_focus_sessions
    }

    /// Returns the elapsed fraction of the current session.
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn remaining_display(&self) -> String {
        self.state.remaining_display()
    }

    /// Runs the completion transition for the current mode and starts the
    /// next one.
    fn complete(&mut self) -> Transition {
        let finished = self.state.mode;
        let next = match finished {
            SessionMode::Focus => {
                self.state.completed_focus_sessions =
                    self.state.completed_focus_sessions.saturating_add(1);
                let next = self.mode_after_focus();
                self.emit(TimerEvent::FocusCompleted {
                    record: SessionRecord::now(&self.config),
                    completed_focus_sessions: self.state.completed_focus_sessions,
                    next_mode: next,
                });
                next
            }
            SessionMode::Break | SessionMode::LongBreak => {
                self.emit(TimerEvent::BreakCompleted { mode: finished });
                SessionMode::Focus
            }
        };

        debug!(
            finished = finished.as_str(),
            next = next.as_str(),
            completed = self.state.completed_focus_sessions,
            "session completed"
        );

        self.begin_session(next);
        Transition { finished, next }
    }

    /// Chooses the break that follows the focus session just counted.
    fn mode_after_focus(&self) -> SessionMode {
        let interval = self.config.sessions_before_long_break.max(1);
        if self.state.completed_focus_sessions % interval == 0 {
            SessionMode::LongBreak
        } else {
            SessionMode::Break
        }
    }

    fn begin_session(&mut self, mode: SessionMode) {
        let duration_seconds = self.config.duration_seconds(mode);
        self.state.begin(mode, duration_seconds);
        self.emit(TimerEvent::SessionStarted {
            mode,
            duration_seconds,
        });
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("event receiver dropped; event discarded");
        }
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_controller() -> (SessionController, mpsc::UnboundedReceiver<TimerEvent>) {
        create_controller_with_config(SessionConfig::default())
    }

    fn create_controller_with_config(
        config: SessionConfig,
    ) -> (SessionController, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SessionController::new(config, tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn focus_records(events: &[TimerEvent]) -> Vec<SessionRecord> {
        events
            .iter()
            .filter_map(|event| match event {
                TimerEvent::FocusCompleted { record, .. } => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // TimerEvent Tests
    // ------------------------------------------------------------------------

    mod timer_event_tests {
        use super::*;

        #[test]
        fn test_notification_messages() {
            let event = TimerEvent::BreakCompleted {
                mode: SessionMode::Break,
            };
            assert_eq!(
                event.notification_message(),
                Some("Break is over! Back to focus.")
            );

            let event = TimerEvent::Tick {
                remaining_seconds: 3,
            };
            assert_eq!(event.notification_message(), None);
            assert_eq!(TimerEvent::Reset.notification_message(), None);
        }

        #[test]
        fn test_focus_completed_message() {
            let (mut controller, mut rx) = create_controller();
            controller.skip();

            let events = drain(&mut rx);
            let completed = events
                .iter()
                .find(|e| matches!(e, TimerEvent::FocusCompleted { .. }))
                .unwrap();
            assert_eq!(
                completed.notification_message(),
                Some("Focus session complete!")
            );
        }
    }

    // ------------------------------------------------------------------------
    // SessionController Tests
    // ------------------------------------------------------------------------

    mod controller_tests {
        use super::*;

        #[test]
        fn test_new_controller() {
            let (controller, _rx) = create_controller();
            let state = controller.state();

            assert_eq!(state.mode, SessionMode::Focus);
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.running);
            assert_eq!(state.completed_focus_sessions, 0);
        }

        #[test]
        fn test_new_controller_sanitizes_config() {
            let config = SessionConfig::default()
                .with_focus_minutes(0)
                .with_sessions_before_long_break(0);
            let (controller, _rx) = create_controller_with_config(config);

            assert_eq!(controller.config().focus_minutes, 1);
            assert_eq!(controller.config().sessions_before_long_break, 1);
        }

        #[test]
        fn test_start() {
            let (mut controller, mut rx) = create_controller();

            controller.start();

            assert_eq!(controller.mode(), SessionMode::Focus);
            assert_eq!(controller.state().remaining_seconds, 25 * 60);
            assert!(controller.is_running());

            let event = rx.try_recv().unwrap();
            assert_eq!(
                event,
                TimerEvent::SessionStarted {
                    mode: SessionMode::Focus,
                    duration_seconds: 1500
                }
            );
        }

        #[test]
        fn test_start_while_running_restarts() {
            let (mut controller, _rx) = create_controller();

            controller.start();
            for _ in 0..10 {
                controller.tick();
            }
            assert_eq!(controller.state().remaining_seconds, 1490);

            controller.start();
            assert_eq!(controller.state().remaining_seconds, 1500);
            assert!(controller.is_running());
        }

        #[test]
        fn test_start_if_idle() {
            let (mut controller, _rx) = create_controller();

            assert!(controller.start_if_idle());
            controller.tick();

            assert!(!controller.start_if_idle());
            assert_eq!(controller.state().remaining_seconds, 1499);

            controller.pause();
            assert!(controller.start_if_idle());
            assert_eq!(controller.state().remaining_seconds, 1500);
        }

        #[test]
        fn test_start_uses_current_mode() {
            let (mut controller, _rx) = create_controller();

            controller.skip();
            controller.pause();
            assert_eq!(controller.mode(), SessionMode::Break);

            controller.start();
            assert_eq!(controller.state().remaining_seconds, 5 * 60);
        }

        #[test]
        fn test_pause() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.tick();
            drain(&mut rx);

            controller.pause();

            assert!(!controller.is_running());
            assert_eq!(controller.state().remaining_seconds, 1499);
            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::Paused {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_pause_when_paused_is_noop() {
            let (mut controller, mut rx) = create_controller();

            controller.pause();

            assert!(!controller.is_running());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_pause_resume_preserves_remaining_time() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.get_state_mut().remaining_seconds = 500;

            controller.pause();
            assert_eq!(controller.tick(), TickOutcome::Idle);
            assert!(controller.resume());

            assert_eq!(controller.state().remaining_seconds, 500);
            assert!(controller.is_running());

            let events = drain(&mut rx);
            assert_eq!(
                events.last(),
                Some(&TimerEvent::Resumed {
                    remaining_seconds: 500
                })
            );
        }

        #[test]
        fn test_resume_with_no_time_left_is_noop() {
            let (mut controller, mut rx) = create_controller();

            let before = controller.state().clone();
            assert!(!controller.resume());

            assert_eq!(controller.state(), &before);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_resume_after_reset_is_noop() {
            let (mut controller, _rx) = create_controller();

            controller.start();
            controller.reset();

            assert!(!controller.resume());
            assert!(!controller.is_running());
            assert_eq!(controller.state().remaining_seconds, 0);
        }

        #[test]
        fn test_resume_while_running() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            drain(&mut rx);

            assert!(controller.resume());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_reset() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.skip();
            controller.tick();
            drain(&mut rx);

            controller.reset();

            let state = controller.state();
            assert_eq!(state.mode, SessionMode::Focus);
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.running);
            assert_eq!(state.completed_focus_sessions, 1);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Reset);
        }

        #[test]
        fn test_tick_decrements() {
            let (mut controller, _rx) = create_controller();

            controller.start();
            let outcome = controller.tick();

            assert_eq!(
                outcome,
                TickOutcome::Counted {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_tick_n_times() {
            let (mut controller, _rx) = create_controller();
            controller.start();

            for n in [1u32, 7, 60, 300] {
                let before = controller.state().remaining_seconds;
                for _ in 0..n {
                    controller.tick();
                }
                assert_eq!(controller.state().remaining_seconds, before - n.min(before));
            }
        }

        #[test]
        fn test_tick_when_idle() {
            let (mut controller, mut rx) = create_controller();

            assert_eq!(controller.tick(), TickOutcome::Idle);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_tick_emits_tick_event() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            drain(&mut rx);
            controller.tick();

            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::Tick {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_completion_fires_on_tick_after_zero() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.get_state_mut().remaining_seconds = 1;

            assert_eq!(
                controller.tick(),
                TickOutcome::Counted {
                    remaining_seconds: 0
                }
            );
            assert_eq!(controller.mode(), SessionMode::Focus);
            assert_eq!(controller.completed_focus_sessions(), 0);

            let outcome = controller.tick();
            assert_eq!(
                outcome,
                TickOutcome::Completed(Transition {
                    finished: SessionMode::Focus,
                    next: SessionMode::Break
                })
            );
            assert_eq!(controller.completed_focus_sessions(), 1);
            assert_eq!(controller.mode(), SessionMode::Break);
            assert_eq!(controller.state().remaining_seconds, 300);
            assert!(controller.is_running());

            assert_eq!(focus_records(&drain(&mut rx)).len(), 1);
        }

        #[test]
        fn test_completion_fires_once() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.get_state_mut().remaining_seconds = 0;

            controller.tick();
            controller.tick();
            controller.tick();

            assert_eq!(controller.completed_focus_sessions(), 1);
            assert_eq!(controller.state().remaining_seconds, 298);
            assert_eq!(focus_records(&drain(&mut rx)).len(), 1);
        }

        #[test]
        fn test_natural_completion_matches_skip() {
            let config = SessionConfig::default()
                .with_focus_minutes(1)
                .with_break_minutes(1);
            let (mut ticked, _rx1) = create_controller_with_config(config.clone());
            let (mut skipped, _rx2) = create_controller_with_config(config);

            ticked.start();
            for _ in 0..=60 {
                ticked.tick();
            }
            skipped.start();
            skipped.skip();

            assert_eq!(ticked.completed_focus_sessions(), 1);
            assert_eq!(skipped.completed_focus_sessions(), 1);
            assert_eq!(ticked.mode(), skipped.mode());
            assert_eq!(
                ticked.state().remaining_seconds,
                skipped.state().remaining_seconds
            );
        }

        #[test]
        fn test_skip_focus_scenario() {
            let config = SessionConfig::default()
                .with_focus_minutes(25)
                .with_break_minutes(5)
                .with_sessions_before_long_break(4)
                .with_task_name("Write report");
            let (mut controller, mut rx) = create_controller_with_config(config);

            controller.start();
            assert_eq!(controller.mode(), SessionMode::Focus);
            assert_eq!(controller.state().remaining_seconds, 1500);

            let transition = controller.skip();

            assert_eq!(
                transition,
                Transition {
                    finished: SessionMode::Focus,
                    next: SessionMode::Break
                }
            );
            assert_eq!(controller.completed_focus_sessions(), 1);
            assert_eq!(controller.mode(), SessionMode::Break);
            assert_eq!(controller.state().remaining_seconds, 300);
            assert!(controller.is_running());

            let records = focus_records(&drain(&mut rx));
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].task_name, "Write report");
            assert_eq!(records[0].focus_minutes, 25);
        }

        #[test]
        fn test_skip_record_without_task() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.skip();

            let records = focus_records(&drain(&mut rx));
            assert_eq!(records[0].task_name, "No Task");
        }

        #[test]
        fn test_skip_break_returns_to_focus() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.skip();
            drain(&mut rx);

            let transition = controller.skip();

            assert_eq!(transition.finished, SessionMode::Break);
            assert_eq!(transition.next, SessionMode::Focus);
            assert_eq!(controller.completed_focus_sessions(), 1);
            assert_eq!(controller.state().remaining_seconds, 1500);

            let events = drain(&mut rx);
            assert_eq!(
                events[0],
                TimerEvent::BreakCompleted {
                    mode: SessionMode::Break
                }
            );
            assert!(focus_records(&events).is_empty());
        }

        #[test]
        fn test_skip_event_order() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            drain(&mut rx);
            controller.skip();

            let events = drain(&mut rx);
            assert_eq!(events.len(), 2);
            assert!(matches!(
                events[0],
                TimerEvent::FocusCompleted {
                    completed_focus_sessions: 1,
                    next_mode: SessionMode::Break,
                    ..
                }
            ));
            assert_eq!(
                events[1],
                TimerEvent::SessionStarted {
                    mode: SessionMode::Break,
                    duration_seconds: 300
                }
            );
        }

        #[test]
        fn test_long_break_every_fourth_focus() {
            let (mut controller, _rx) = create_controller();
            controller.start();

            let mut break_modes = Vec::new();
            for _ in 0..8 {
                assert_eq!(controller.mode(), SessionMode::Focus);
                let transition = controller.skip();
                break_modes.push(transition.next);
                controller.skip();
            }

            assert_eq!(
                break_modes,
                vec![
                    SessionMode::Break,
                    SessionMode::Break,
                    SessionMode::Break,
                    SessionMode::LongBreak,
                    SessionMode::Break,
                    SessionMode::Break,
                    SessionMode::Break,
                    SessionMode::LongBreak,
                ]
            );
            assert_eq!(controller.completed_focus_sessions(), 8);
        }

        #[test]
        fn test_long_break_duration() {
            let config = SessionConfig::default().with_sessions_before_long_break(1);
            let (mut controller, _rx) = create_controller_with_config(config);

            controller.start();
            controller.skip();

            assert_eq!(controller.mode(), SessionMode::LongBreak);
            assert_eq!(controller.state().remaining_seconds, 15 * 60);
        }

        #[test]
        fn test_counter_is_monotonic() {
            let (mut controller, _rx) = create_controller();
            let mut last = 0;

            controller.start();
            for step in 0..20 {
                match step % 4 {
                    0 => {
                        controller.skip();
                    }
                    1 => controller.reset(),
                    2 => controller.pause(),
                    _ => controller.start(),
                }
                assert!(controller.completed_focus_sessions() >= last);
                last = controller.completed_focus_sessions();
            }
        }

        #[test]
        fn test_update_config_does_not_touch_running_session() {
            let (mut controller, _rx) = create_controller();

            controller.start();
            controller.tick();
            controller.update_config(SessionConfig::default().with_focus_minutes(50));

            assert_eq!(controller.state().remaining_seconds, 1499);
            assert_eq!(controller.state().duration_seconds, 1500);

            controller.start();
            assert_eq!(controller.state().remaining_seconds, 3000);
        }

        #[test]
        fn test_record_uses_config_at_completion() {
            let (mut controller, mut rx) = create_controller();

            controller.start();
            controller.update_config(
                SessionConfig::default()
                    .with_focus_minutes(40)
                    .with_task_name("Changed"),
            );
            controller.skip();

            let records = focus_records(&drain(&mut rx));
            assert_eq!(records[0].focus_minutes, 40);
            assert_eq!(records[0].task_name, "Changed");
        }

        #[test]
        fn test_progress_and_display() {
            let (mut controller, _rx) = create_controller();
            assert_eq!(controller.progress(), 0.0);
            assert_eq!(controller.remaining_display(), "00:00");

            controller.start();
            controller.get_state_mut().remaining_seconds = 750;

            assert!((controller.progress() - 0.5).abs() < f64::EPSILON);
            assert_eq!(controller.remaining_display(), "12:30");
        }

        #[test]
        fn test_invariant_remaining_within_duration() {
            let (mut controller, _rx) = create_controller();
            controller.start();

            for step in 0..5000 {
                if step % 997 == 0 {
                    controller.skip();
                }
                controller.tick();
                let state = controller.state();
                assert!(state.remaining_seconds <= state.duration_seconds);
            }
        }

        #[test]
        fn test_dropped_receiver_does_not_fail() {
            let (mut controller, rx) = create_controller();
            drop(rx);

            controller.start();
            controller.tick();
            controller.skip();

            assert_eq!(controller.completed_focus_sessions(), 1);
        }
    }
}
