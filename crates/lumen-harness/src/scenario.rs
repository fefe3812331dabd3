//! Helpers for building E1.31 datagrams in end-to-end scenario tests.

use lumen_proto::{
    cid::Cid,
    dmx::{DmxBuffer, MAX_SLOTS},
    frame::{self, DataFrame},
    framing::FramingHeader,
};

/// Build a DMX frame's encoded bytes with `dmx[0]` set to `first_slot` and
/// the rest zeroed, matching the S1-style fixture frames used across the
/// scenario tests.
#[must_use]
pub fn dmx_frame_bytes(
    cid: Cid,
    source_name: &str,
    priority: u8,
    sequence: u8,
    universe: u16,
    first_slot: u8,
) -> Vec<u8> {
    let mut slots = vec![0u8; MAX_SLOTS];
    slots[0] = first_slot;
    let frame = DataFrame {
        cid,
        framing: FramingHeader { source_name: source_name.to_string(), priority, sequence, universe },
        start_code: 0x00,
        slots: DmxBuffer::from_slice(&slots).expect("512 slots fits"),
    };
    frame::encode(&frame).expect("a well-formed fixture frame always encodes")
}
