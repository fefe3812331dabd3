//! Per-universe receive state and source arbitration.

use std::time::Duration;

use lumen_proto::{Cid, DmxBuffer};

/// A source must be silent this long before a lower-priority source may
/// take over its universe.
pub const ARBITRATION_TIMEOUT: Duration = Duration::from_millis(2500);

/// Sequence numbers within this many steps behind the last accepted one are
/// treated as stale (duplicates or reordered replays).
const SEQUENCE_REAR_WINDOW: u8 = 20;

/// A received sequence whose wraparound distance from the last accepted one
/// is 0 (duplicate) or >= this threshold (within the rear window) is stale.
const STALE_THRESHOLD: u8 = (256 - (SEQUENCE_REAR_WINDOW as u16 - 1)) as u8;

/// Outcome of feeding one inbound frame to a registered universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbitrationOutcome {
    /// Delivered to the handler; this is the first frame ever seen.
    AcceptedNewSource,
    /// Delivered to the handler; same source, sequence in order.
    AcceptedInOrder,
    /// Delivered to the handler; a new source took over (priority or
    /// timeout).
    AcceptedSourceSwitch,
    /// Dropped: same source, sequence within the stale rear window.
    DroppedStaleSequence,
    /// Dropped: different, lower-or-equal priority source, and the current
    /// source has not yet timed out.
    DroppedArbitration,
}

/// Callback invoked with the merged DMX buffer for a universe.
pub type Handler = Box<dyn FnMut(&DmxBuffer) + Send>;

/// State tracked for a universe this node is receiving on.
pub struct RxUniverse<I> {
    handler: Handler,
    last_source_cid: Option<Cid>,
    last_source_priority: u8,
    last_accepted_sequence: Option<u8>,
    last_arrival: Option<I>,
}

impl<I: Copy + Ord + std::ops::Sub<Output = Duration>> RxUniverse<I> {
    /// Register a new rx entry with the given handler; no source has been
    /// seen yet.
    pub fn new(handler: Handler) -> Self {
        Self {
            handler,
            last_source_cid: None,
            last_source_priority: 0,
            last_accepted_sequence: None,
            last_arrival: None,
        }
    }

    /// Replace the handler without disturbing arbitration state.
    pub fn set_handler(&mut self, handler: Handler) {
        self.handler = handler;
    }

    /// Decide whether to accept a frame from `cid` at `priority` with wire
    /// `sequence`, arriving at `now`. On acceptance, invokes the handler
    /// with `slots` and updates arbitration state.
    pub fn deliver(
        &mut self,
        now: I,
        cid: Cid,
        priority: u8,
        sequence: u8,
        slots: &DmxBuffer,
    ) -> ArbitrationOutcome {
        let outcome = match self.last_source_cid {
            None => ArbitrationOutcome::AcceptedNewSource,
            Some(current) if current == cid => {
                if self.is_stale(sequence) {
                    ArbitrationOutcome::DroppedStaleSequence
                } else {
                    ArbitrationOutcome::AcceptedInOrder
                }
            },
            Some(_) => {
                let timed_out = self
                    .last_arrival
                    .is_none_or(|last| now - last >= ARBITRATION_TIMEOUT);
                if priority > self.last_source_priority || timed_out {
                    ArbitrationOutcome::AcceptedSourceSwitch
                } else {
                    ArbitrationOutcome::DroppedArbitration
                }
            },
        };

        match outcome {
            ArbitrationOutcome::AcceptedNewSource | ArbitrationOutcome::AcceptedSourceSwitch => {
                self.last_source_cid = Some(cid);
                self.last_source_priority = priority;
                self.last_accepted_sequence = Some(sequence);
                self.last_arrival = Some(now);
                (self.handler)(slots);
            },
            ArbitrationOutcome::AcceptedInOrder => {
                self.last_accepted_sequence = Some(sequence);
                self.last_arrival = Some(now);
                (self.handler)(slots);
            },
            ArbitrationOutcome::DroppedStaleSequence | ArbitrationOutcome::DroppedArbitration => {},
        }

        outcome
    }

    fn is_stale(&self, received: u8) -> bool {
        let Some(last) = self.last_accepted_sequence else {
            return false;
        };
        let diff = received.wrapping_sub(last);
        diff == 0 || diff >= STALE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn noop_handler() -> Handler {
        Box::new(|_| {})
    }

    #[test]
    fn rejects_stale_sequence_within_rear_window() {
        let mut rx: RxUniverse<Instant> = RxUniverse::new(noop_handler());
        let now = Instant::now();
        let cid = Cid::new([1u8; 16]);

        assert_eq!(
            rx.deliver(now, cid, 100, 10, &DmxBuffer::empty()),
            ArbitrationOutcome::AcceptedNewSource
        );
        // a replay of sequence 5 is 5 steps behind the last accepted (10),
        // well within the 20-frame rear window
        assert_eq!(
            rx.deliver(now, cid, 100, 5, &DmxBuffer::empty()),
            ArbitrationOutcome::DroppedStaleSequence
        );
        assert_eq!(
            rx.deliver(now, cid, 100, 11, &DmxBuffer::empty()),
            ArbitrationOutcome::AcceptedInOrder
        );
    }

    #[test]
    fn priority_switch_and_timeout_readmission() {
        let mut rx: RxUniverse<Instant> = RxUniverse::new(noop_handler());
        let now = Instant::now();
        let cid_a = Cid::new([1u8; 16]);
        let cid_b = Cid::new([2u8; 16]);

        rx.deliver(now, cid_a, 100, 0, &DmxBuffer::empty());
        assert_eq!(
            rx.deliver(now, cid_b, 150, 0, &DmxBuffer::empty()),
            ArbitrationOutcome::AcceptedSourceSwitch
        );
        assert_eq!(
            rx.deliver(now, cid_a, 100, 1, &DmxBuffer::empty()),
            ArbitrationOutcome::DroppedArbitration
        );

        let later = now + ARBITRATION_TIMEOUT;
        assert_eq!(
            rx.deliver(later, cid_a, 100, 1, &DmxBuffer::empty()),
            ArbitrationOutcome::AcceptedSourceSwitch
        );
    }
}
