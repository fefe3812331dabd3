//! Deterministic clock for SLP aging and arbitration-timeout tests.
//!
//! Mirrors the teacher's environment-abstraction-for-determinism idea: test
//! code advances a virtual clock explicitly instead of sleeping, so
//! multi-second timeouts (arbitration takeover, SLP lifetime expiry) run
//! instantly and reproducibly.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use lumen_core::env::Environment;
use lumen_core::slp::AddDuration;

/// A virtual instant: an offset from the mock clock's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(Duration);

impl std::ops::Sub for MockInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0 - rhs.0
    }
}

impl AddDuration for MockInstant {
    fn add_duration(self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

/// Shared virtual clock. Cloning `MockEnv` shares the same clock, the way
/// cloning a handle to a real socket or RNG would in production.
#[derive(Clone, Default)]
pub struct MockEnv {
    now: Arc<Mutex<Duration>>,
}

impl MockEnv {
    /// A fresh clock starting at t=0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `seconds` and `micros`. Affects every `MockEnv`
    /// clone sharing this clock.
    pub fn advance_time(&self, seconds: u64, micros: u32) {
        let mut now = self.now.lock().expect("mock clock mutex poisoned");
        *now += Duration::new(seconds, micros * 1_000);
    }

    /// The current virtual instant.
    #[must_use]
    pub fn current_time(&self) -> MockInstant {
        MockInstant(*self.now.lock().expect("mock clock mutex poisoned"))
    }
}

impl Environment for MockEnv {
    type Instant = MockInstant;

    fn now(&self) -> Self::Instant {
        self.current_time()
    }

    async fn sleep(&self, _duration: Duration) {
        // The virtual clock only moves via `advance_time`; a mock sleep
        // resolves immediately so scenario tests stay synchronous.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_time_moves_shared_clock() {
        let env = MockEnv::new();
        let clone = env.clone();
        assert_eq!(env.now(), MockInstant(Duration::ZERO));

        clone.advance_time(5, 500);
        assert_eq!(env.now(), MockInstant(Duration::new(5, 500_000)));
    }
}
