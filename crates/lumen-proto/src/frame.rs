//! Full E1.31 datagram: root + framing + DMP composed together.

use crate::{
    cid::Cid,
    dmp::{self, DmpPayload},
    dmx::DmxBuffer,
    errors::Result,
    framing::{self, FramingHeader},
    root::{self, RootHeader},
};

/// Everything needed to build or interpret one E1.31 data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    /// Sending component's identifier.
    pub cid: Cid,
    /// Source name, priority, sequence, universe.
    pub framing: FramingHeader,
    /// DMX512 start code.
    pub start_code: u8,
    /// DMX slot data.
    pub slots: DmxBuffer,
}

/// Encode a complete E1.31 datagram (preamble through DMX slots).
pub fn encode(frame: &DataFrame) -> Result<Vec<u8>> {
    let dmp_bytes = dmp::encode(frame.start_code, &frame.slots)?;
    let framing_bytes = framing::encode(&frame.framing, &dmp_bytes)?;
    root::encode(RootHeader { cid: frame.cid }, &framing_bytes)
}

/// Decode a complete E1.31 datagram into its root, framing and DMP parts.
pub fn decode(datagram: &[u8]) -> Result<DataFrame> {
    let (root_header, framing_bytes) = root::decode(datagram)?;
    let (framing_header, dmp_bytes) = framing::decode(framing_bytes)?;
    let DmpPayload { start_code, slots } = dmp::decode(dmp_bytes)?;
    Ok(DataFrame { cid: root_header.cid, framing: framing_header, start_code, slots })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame {
            cid: Cid::new([0x42; 16]),
            framing: FramingHeader {
                source_name: "lumen-noded".to_string(),
                priority: 100,
                sequence: 0,
                universe: 1,
            },
            start_code: 0x00,
            slots: DmxBuffer::blackout(),
        }
    }

    #[test]
    fn round_trip() {
        let frame = sample();
        let datagram = encode(&frame).unwrap();
        let decoded = decode(&datagram).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn matches_scenario_s1_byte_count() {
        // preamble 16 + root header 22 + framing header 77 + dmp 523
        let frame = sample();
        let datagram = encode(&frame).unwrap();
        assert_eq!(datagram.len(), 16 + 22 + 77 + 523);
    }

    #[test]
    fn rejects_corrupted_datagram() {
        let frame = sample();
        let mut datagram = encode(&frame).unwrap();
        datagram[0] = 0xFF;
        assert!(decode(&datagram).is_err());
    }
}
