//! Environment abstraction for deterministic testing.
//!
//! Decouples the node and SLP store from the system clock, so the scenario
//! tests in `lumen-harness` can advance time explicitly instead of sleeping.

use std::time::Duration;

/// Abstract environment providing monotonic time and an async sleep.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - `sleep()` is the only suspension point driver code relies on
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`; test environments
    /// use a virtual clock advanced explicitly by `AdvanceTime`.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the only async method in the trait; it is used by the
    /// receive loop's timer wheel, never by `E131Node` or `SlpStore`
    /// themselves, which are synchronous.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
