//! Fixed-interval tick gating
//!
//! The frame loop polls input and renders as often as it likes; the gate
//! decides whether enough time has passed for the simulation to advance.
//! Ticks missed while the loop was stalled are dropped, never replayed, so
//! a slow frame produces one late step rather than a burst of catch-up steps.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickGate {
    interval: Duration,
    last_tick: Duration,
}

impl TickGate {
    /// Create a gate armed at `now`
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Returns true if a step should run at `now`, and if so records it.
    ///
    /// The gate opens only once strictly more than one interval has elapsed.
    pub fn ready(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_tick) > self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Re-arm the gate, e.g. when a new round starts
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Time left until the gate can open
    pub fn until_next(&self, now: Duration) -> Duration {
        (self.last_tick + self.interval).saturating_sub(now)
    }
}
