//! Fixed-interval tick scheduler
//!
//! Frame time is fed in with [`Scheduler::advance`] and due ticks are
//! drained one at a time with [`Scheduler::take_due`]. Changing the
//! interval, pausing, stopping and starting all discard accumulated time,
//! so a tick scheduled under the old timing can never fire afterwards.

/// Backlog cap: a long stall (hidden tab, debugger) replays at most this
/// many ticks instead of fast-forwarding the game
pub const MAX_CATCH_UP_TICKS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    interval_ms: u32,
    accumulator_ms: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Stopped,
            interval_ms: 100,
            accumulator_ms: 0.0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Begin firing every `interval_ms`, from any state
    pub fn start(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.accumulator_ms = 0.0;
        self.state = SchedulerState::Running;
    }

    /// Running -> Paused. Returns whether the transition happened.
    pub fn pause(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        self.state = SchedulerState::Paused;
        self.accumulator_ms = 0.0;
        true
    }

    /// Paused -> Running. Returns whether the transition happened.
    pub fn resume(&mut self) -> bool {
        if self.state != SchedulerState::Paused {
            return false;
        }
        self.state = SchedulerState::Running;
        self.accumulator_ms = 0.0;
        true
    }

    /// Any -> Stopped, cancelling whatever was pending
    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
        self.accumulator_ms = 0.0;
    }

    /// Cancel the pending fire and restart timing with a new interval.
    ///
    /// Partial elapsed time is dropped, so the next tick comes one full
    /// `interval_ms` after this call.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.accumulator_ms = 0.0;
    }

    /// Account for `elapsed_ms` of wall-clock time
    pub fn advance(&mut self, elapsed_ms: f64) {
        if self.state != SchedulerState::Running || !elapsed_ms.is_finite() {
            return;
        }
        let cap = self.interval_ms as f64 * MAX_CATCH_UP_TICKS as f64;
        self.accumulator_ms = (self.accumulator_ms + elapsed_ms.max(0.0)).min(cap);
    }

    /// Consume one due tick, if any
    pub fn take_due(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        let interval = self.interval_ms as f64;
        if self.accumulator_ms >= interval {
            self.accumulator_ms -= interval;
            true
        } else {
            false
        }
    }
}
