//! `E131Node`: per-universe tx/rx state and the synchronous API exposed to
//! collaborators (RPC, admin surface, plugin transports — none of which are
//! implemented here).

use std::collections::HashMap;

use lumen_proto::{
    cid::Cid,
    dmx::DmxBuffer,
    frame::{self, DataFrame},
    framing::{FramingHeader, MAX_SOURCE_NAME_LEN, MAX_UNIVERSE, MIN_UNIVERSE},
};
use tracing::{debug, info};

use crate::{
    env::Environment,
    error::NodeError,
    node::{
        rx::{ArbitrationOutcome, Handler, RxUniverse},
        tx::{TxUniverse, MAX_PRIORITY},
    },
};

fn validate_universe(universe: u16) -> Result<(), NodeError> {
    if !(MIN_UNIVERSE..=MAX_UNIVERSE).contains(&universe) {
        return Err(NodeError::UniverseOutOfRange { universe: u32::from(universe) });
    }
    Ok(())
}

/// Outcome of handing one inbound datagram to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// Datagram failed wire-format validation; dropped, counted.
    WireFormatDropped,
    /// Datagram came from our own CID and loopback is disabled.
    LoopbackDropped,
    /// No handler is registered for the decoded universe.
    NoHandler,
    /// The DMP start code was not `0x00` (standard DMX512). Alternate start
    /// codes (RDM, etc.) are dropped until an explicit opt-in exists.
    AlternateStartCodeDropped,
    /// Datagram was handed to the arbitration layer; see the returned
    /// outcome for whether it was delivered.
    Arbitrated(ArbitrationOutcome),
}

/// The E1.31 node facade: owns tx/rx per-universe state, encodes outgoing
/// frames, and arbitrates incoming ones. Holds no socket — `lumen-node`
/// drives this with bytes read from and written to a real `UdpSocket`.
pub struct E131Node<E: Environment> {
    env: E,
    cid: Cid,
    enable_loopback: bool,
    running: bool,
    tx_universes: HashMap<u16, TxUniverse>,
    rx_universes: HashMap<u16, RxUniverse<E::Instant>>,
}

impl<E: Environment> E131Node<E> {
    /// Construct a node with a freshly generated CID.
    #[must_use]
    pub fn new(env: E, enable_loopback: bool) -> Self {
        Self {
            env,
            cid: Cid::generate(),
            enable_loopback,
            running: false,
            tx_universes: HashMap::new(),
            rx_universes: HashMap::new(),
        }
    }

    /// This node's component identifier.
    #[must_use]
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// True between `start()` and `stop()`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mark the node running. The caller (`lumen-node`) is responsible for
    /// binding the actual socket and reporting bind failure to its own
    /// caller; this call never fails.
    pub fn start(&mut self) {
        self.running = true;
        info!(cid = %self.cid, "node started");
    }

    /// Stop the node: drop all tx/rx state. Idempotent.
    pub fn stop(&mut self) {
        self.tx_universes.clear();
        self.rx_universes.clear();
        self.running = false;
        info!(cid = %self.cid, "node stopped");
    }

    /// Install or replace the source name for outgoing frames on `universe`.
    pub fn set_source_name(&mut self, universe: u16, name: &str) -> Result<(), NodeError> {
        validate_universe(universe)?;
        if name.is_empty() || name.len() > MAX_SOURCE_NAME_LEN {
            return Err(NodeError::InvalidSourceName {
                reason: if name.is_empty() { "empty" } else { "exceeds 64 bytes" },
            });
        }
        self.tx_universes.entry(universe).or_insert_with(TxUniverse::new).source_name = name.to_string();
        Ok(())
    }

    /// Clamp `priority` to `[0, 200]` and store it for `universe`.
    pub fn set_source_priority(&mut self, universe: u16, priority: u8) -> Result<(), NodeError> {
        validate_universe(universe)?;
        let clamped = priority.min(MAX_PRIORITY);
        self.tx_universes.entry(universe).or_insert_with(TxUniverse::new).priority = clamped;
        Ok(())
    }

    /// Build and return the datagram bytes for one DMX frame on `universe`,
    /// advancing that universe's sequence counter.
    pub fn send_dmx(&mut self, universe: u16, buf: &DmxBuffer) -> Result<Vec<u8>, NodeError> {
        if !self.running {
            return Err(NodeError::NotRunning);
        }
        validate_universe(universe)?;

        let tx = self.tx_universes.entry(universe).or_insert_with(TxUniverse::new);
        let sequence = tx.next_sequence();

        let frame = DataFrame {
            cid: self.cid,
            framing: FramingHeader {
                source_name: tx.source_name.clone(),
                priority: tx.priority,
                sequence,
                universe,
            },
            start_code: 0x00,
            slots: buf.clone(),
        };

        frame::encode(&frame).map_err(|e| NodeError::TransportTransient(e.to_string()))
    }

    /// Register `handler` for `universe`, replacing any existing one.
    ///
    /// Returns `true` if this is the first registration for `universe`
    /// (the caller should join the universe's multicast group), `false` if
    /// it replaced an existing handler (already joined).
    pub fn set_handler(&mut self, universe: u16, handler: Handler) -> Result<bool, NodeError> {
        validate_universe(universe)?;
        if let Some(rx) = self.rx_universes.get_mut(&universe) {
            rx.set_handler(handler);
            Ok(false)
        } else {
            self.rx_universes.insert(universe, RxUniverse::new(handler));
            Ok(true)
        }
    }

    /// Remove the rx entry for `universe`. Returns `true` if an entry was
    /// actually removed (the caller should leave the multicast group).
    pub fn remove_handler(&mut self, universe: u16) -> bool {
        self.rx_universes.remove(&universe).is_some()
    }

    /// Decode and arbitrate one inbound datagram.
    pub fn on_datagram(&mut self, bytes: &[u8]) -> DatagramOutcome {
        let frame = match frame::decode(bytes) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(error = %err, "dropping datagram: wire format");
                return DatagramOutcome::WireFormatDropped;
            },
        };

        if frame.cid == self.cid && !self.enable_loopback {
            debug!("dropping datagram: loopback suppression");
            return DatagramOutcome::LoopbackDropped;
        }

        let Some(rx) = self.rx_universes.get_mut(&frame.framing.universe) else {
            return DatagramOutcome::NoHandler;
        };

        if frame.start_code != 0x00 {
            debug!(start_code = frame.start_code, "dropping non-DMX start code");
            return DatagramOutcome::AlternateStartCodeDropped;
        }

        let outcome = rx.deliver(
            self.env.now(),
            frame.cid,
            frame.framing.priority,
            frame.framing.sequence,
            &frame.slots,
        );
        if matches!(
            outcome,
            ArbitrationOutcome::DroppedStaleSequence | ArbitrationOutcome::DroppedArbitration
        ) {
            debug!(universe = frame.framing.universe, ?outcome, "frame dropped");
        }
        DatagramOutcome::Arbitrated(outcome)
    }
}
