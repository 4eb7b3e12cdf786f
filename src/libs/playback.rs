//! Sequential playback engine for the ordered task list.
//!
//! A single-threaded state machine driven by a one-tick-per-second clock.
//! It walks the canonical task order, running one countdown at a time,
//! auto-advancing between timed tasks after a short grace delay, and parking
//! in a waiting state when the next task has no countdown to run.
//!
//! "Next" is always resolved against the order slice passed to the call at
//! the moment it is needed, never cached — reordering the list while a timer
//! runs does not interrupt it, but changes what completion and skip resolve to.
//!
//! The machine holds no clock of its own; the caller owns the tick source
//! (see the `play` command) and feeds `tick()` once per second.

use crate::libs::task::Task;

/// Pause between automatic task timer transitions, in ticks. Gives an
/// unattended user time to notice the switch before the next countdown
/// starts.
pub const GRACE_SECS: u32 = 5;

/// Playback position within the task list.
///
/// `Grace` is the cancellable deferred auto-start scheduled when a countdown
/// expires and the next task is itself timed. Modeling it as a state keeps
/// the whole engine on one clock and makes cancellation a plain state
/// replacement. At most one countdown or waiting state exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No active or waiting task.
    Idle,
    /// Countdown in progress, decrementing once per tick.
    Running { task_id: i64, remaining_secs: u32 },
    /// Countdown frozen; resumable with the same remaining time.
    Paused { task_id: i64, remaining_secs: u32 },
    /// Auto-start of `next_task_id` pending; counts down the grace delay.
    Grace { next_task_id: i64, remaining_secs: u32 },
    /// Advanced to a task without a runnable countdown; manual advance
    /// required.
    Waiting { task_id: i64 },
}

/// Signals emitted by `tick()` for the caller to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A countdown reached zero. Rendered as the three-tone ascending alert.
    TimerCompleted { task_id: i64 },
    /// The grace delay elapsed and the next timed task started automatically.
    AutoStarted { task_id: i64 },
}

#[derive(Debug)]
pub struct Playback {
    state: PlaybackState,
}

impl Playback {
    pub fn new() -> Self {
        Playback { state: PlaybackState::Idle }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlaybackState::Idle
    }

    /// Starts a countdown for the given task, replacing whatever was active
    /// (at most one timer exists system-wide). Tasks without a runnable
    /// timer are ignored: the control is disabled in the UI, so a stray
    /// start is a no-op rather than an error.
    pub fn start(&mut self, task: &Task) {
        if !task.has_runnable_timer() {
            return;
        }
        self.state = PlaybackState::Running {
            task_id: task.id,
            remaining_secs: task.duration_secs(),
        };
    }

    /// Enters playback at the head of the list: a countdown when the first
    /// task is timed, otherwise a waiting state. Entry point for the `play`
    /// command.
    pub fn begin(&mut self, order: &[Task]) {
        self.state = match order.first() {
            None => PlaybackState::Idle,
            Some(first) if first.has_runnable_timer() => PlaybackState::Running {
                task_id: first.id,
                remaining_secs: first.duration_secs(),
            },
            Some(first) => PlaybackState::Waiting { task_id: first.id },
        };
    }

    pub fn pause(&mut self) {
        if let PlaybackState::Running { task_id, remaining_secs } = self.state {
            self.state = PlaybackState::Paused { task_id, remaining_secs };
        }
    }

    pub fn resume(&mut self) {
        if let PlaybackState::Paused { task_id, remaining_secs } = self.state {
            self.state = PlaybackState::Running { task_id, remaining_secs };
        }
    }

    /// Cancels any countdown, pending auto-start, or waiting state.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
    }

    /// Advances one second. Only `Running` and `Grace` states consume ticks.
    ///
    /// On countdown expiry this emits `TimerCompleted` and applies the
    /// completion rule: no next task → idle; next task timed → grace delay
    /// before auto-start; otherwise → waiting for manual advance.
    pub fn tick(&mut self, order: &[Task]) -> Option<PlaybackEvent> {
        match self.state {
            PlaybackState::Running { task_id, remaining_secs } => {
                let remaining = remaining_secs.saturating_sub(1);
                if remaining > 0 {
                    self.state = PlaybackState::Running { task_id, remaining_secs: remaining };
                    return None;
                }
                self.state = Self::after_completion(task_id, order);
                Some(PlaybackEvent::TimerCompleted { task_id })
            }
            PlaybackState::Grace { next_task_id, remaining_secs } => {
                let remaining = remaining_secs.saturating_sub(1);
                if remaining > 0 {
                    self.state = PlaybackState::Grace {
                        next_task_id,
                        remaining_secs: remaining,
                    };
                    return None;
                }
                // Resolve the target against the current order: it may have
                // been deleted or had its timer disabled during the delay.
                match order.iter().find(|t| t.id == next_task_id) {
                    Some(task) if task.has_runnable_timer() => {
                        self.state = PlaybackState::Running {
                            task_id: task.id,
                            remaining_secs: task.duration_secs(),
                        };
                        Some(PlaybackEvent::AutoStarted { task_id: task.id })
                    }
                    Some(task) => {
                        self.state = PlaybackState::Waiting { task_id: task.id };
                        None
                    }
                    None => {
                        self.state = PlaybackState::Idle;
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Moves to the task after the current one, cancelling any pending
    /// grace delay. Unlike auto-advance there is no grace: a timed next task
    /// starts immediately, an untimed one parks in waiting. No-op when idle.
    pub fn skip_to_next(&mut self, order: &[Task]) {
        let anchor = match self.state {
            PlaybackState::Idle => return,
            PlaybackState::Running { task_id, .. } | PlaybackState::Paused { task_id, .. } | PlaybackState::Waiting { task_id } => task_id,
            // Skipping during grace moves past the task that was about to
            // auto-start.
            PlaybackState::Grace { next_task_id, .. } => next_task_id,
        };
        self.state = match next_after(anchor, order) {
            None => PlaybackState::Idle,
            Some(next) if next.has_runnable_timer() => PlaybackState::Running {
                task_id: next.id,
                remaining_secs: next.duration_secs(),
            },
            Some(next) => PlaybackState::Waiting { task_id: next.id },
        };
    }

    /// Completion rule on natural countdown expiry.
    fn after_completion(completed_id: i64, order: &[Task]) -> PlaybackState {
        match next_after(completed_id, order) {
            None => PlaybackState::Idle,
            Some(next) if next.has_runnable_timer() => PlaybackState::Grace {
                next_task_id: next.id,
                remaining_secs: GRACE_SECS,
            },
            Some(next) => PlaybackState::Waiting { task_id: next.id },
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

/// The task following `id` in the given canonical order, if any. A task
/// deleted out from under the engine resolves to "no next task".
fn next_after(id: i64, order: &[Task]) -> Option<&Task> {
    let index = order.iter().position(|t| t.id == id)?;
    order.get(index + 1)
}
