use std::time::{Duration, Instant};

/// Passive countdown queried with an explicit clock reading.
///
/// Nothing ticks on its own; expiry is only noticed when someone asks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    duration: Duration,
    started_at: Instant,
}

impl Countdown {
    pub fn start(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            started_at: now,
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.started_at = now;
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}
