//! Framing layer (`E131Layer`): source name, priority, sequence, universe.

use crate::{
    errors::{Result, WireError},
    pdu::{decode_flags_length, encode_flags_length},
};

const LAYER: &str = "framing";

/// Framing PDU vector selecting "this carries DMP data".
pub const VECTOR_E131_DATA: u32 = 0x0000_0002;

/// Maximum length of a source name, in UTF-8 bytes.
pub const MAX_SOURCE_NAME_LEN: usize = 64;

/// Smallest valid DMX universe number.
pub const MIN_UNIVERSE: u16 = 1;
/// Largest valid DMX universe number.
pub const MAX_UNIVERSE: u16 = 63999;

const SOURCE_NAME_FIELD_LEN: usize = 64;
/// Total framing PDU header size including the 2-byte flags+length field
/// (2 + vector(4) + source(64) + priority(1) + sync_address(2) +
/// sequence(1) + options(1) + universe(2) == 77).
const HEADER_LEN: usize = 2 + 4 + SOURCE_NAME_FIELD_LEN + 1 + 2 + 1 + 1 + 2;

/// Framing-layer header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingHeader {
    /// Source name (already stripped of trailing NULs).
    pub source_name: String,
    /// Sender priority, raw as received (0..=255 on the wire).
    pub priority: u8,
    /// 8-bit wraparound sequence counter.
    pub sequence: u8,
    /// Destination universe.
    pub universe: u16,
}

/// Encode the framing PDU (header + `dmp_payload`).
///
/// # Errors
///
/// Returns [`WireError::FieldOutOfRange`] if the source name exceeds 64
/// bytes or the universe is outside `[1, 63999]`.
pub fn encode(header: &FramingHeader, dmp_payload: &[u8]) -> Result<Vec<u8>> {
    if header.source_name.len() > MAX_SOURCE_NAME_LEN {
        return Err(WireError::FieldOutOfRange {
            field: "framing.source_name",
            value: header.source_name.len() as u32,
        });
    }
    if !(MIN_UNIVERSE..=MAX_UNIVERSE).contains(&header.universe) {
        return Err(WireError::FieldOutOfRange {
            field: "framing.universe",
            value: u32::from(header.universe),
        });
    }

    let pdu_len = HEADER_LEN + dmp_payload.len();
    let pdu_len_u16 = u16::try_from(pdu_len)
        .map_err(|_| WireError::FieldOutOfRange { field: "framing.pdu_len", value: pdu_len as u32 })?;

    let mut out = Vec::with_capacity(pdu_len);
    out.extend_from_slice(&encode_flags_length(pdu_len_u16)?);
    out.extend_from_slice(&VECTOR_E131_DATA.to_be_bytes());

    let mut name_field = [0u8; SOURCE_NAME_FIELD_LEN];
    let name_bytes = header.source_name.as_bytes();
    name_field[..name_bytes.len()].copy_from_slice(name_bytes);
    out.extend_from_slice(&name_field);

    out.push(header.priority);
    out.extend_from_slice(&0u16.to_be_bytes()); // sync_address: unused, always 0
    out.push(header.sequence);
    out.push(0u8); // options: unused, always 0
    out.extend_from_slice(&header.universe.to_be_bytes());
    out.extend_from_slice(dmp_payload);
    Ok(out)
}

/// Decode a framing PDU from `bytes` (the root layer's payload).
///
/// Returns the parsed header and the remaining bytes (the DMP-layer
/// payload).
pub fn decode(bytes: &[u8]) -> Result<(FramingHeader, &[u8])> {
    if bytes.len() < HEADER_LEN {
        return Err(WireError::HeaderTooShort {
            layer: LAYER,
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let (_, declared_len) =
        decode_flags_length([bytes[0], bytes[1]], LAYER).map_err(|e| match e {
            WireError::BadFlags { flags, .. } => WireError::BadFlags { layer: LAYER, flags },
            other => other,
        })?;
    let declared_len = declared_len as usize;

    if declared_len < HEADER_LEN {
        return Err(WireError::DeclaredLengthTooShort { layer: LAYER, declared: declared_len });
    }
    if declared_len > bytes.len() {
        return Err(WireError::DeclaredLengthExceedsBuffer {
            layer: LAYER,
            declared: declared_len,
            remaining: bytes.len(),
        });
    }

    let vector = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
    if vector != VECTOR_E131_DATA {
        return Err(WireError::UnknownVector { layer: LAYER, vector });
    }

    let name_field = &bytes[6..6 + SOURCE_NAME_FIELD_LEN];
    let name_end = name_field.iter().position(|&b| b == 0).unwrap_or(name_field.len());
    let source_name = String::from_utf8_lossy(&name_field[..name_end]).into_owned();

    let mut offset = 6 + SOURCE_NAME_FIELD_LEN;
    let priority = bytes[offset];
    offset += 1 + 2; // priority, sync_address (ignored)
    let sequence = bytes[offset];
    offset += 1 + 1; // sequence, options (ignored)
    let universe = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);

    if !(MIN_UNIVERSE..=MAX_UNIVERSE).contains(&universe) {
        return Err(WireError::FieldOutOfRange { field: "framing.universe", value: u32::from(universe) });
    }

    let header = FramingHeader { source_name, priority, sequence, universe };
    let payload = &bytes[HEADER_LEN..declared_len];
    Ok((header, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FramingHeader {
        FramingHeader { source_name: "e131".to_string(), priority: 1, sequence: 2, universe: 6001 }
    }

    #[test]
    fn round_trip() {
        let header = sample();
        let encoded = encode(&header, b"dmp-payload").unwrap();
        let (decoded, payload) = decode(&encoded).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(payload, b"dmp-payload");
    }

    #[test]
    fn rejects_oversized_source_name() {
        let mut header = sample();
        header.source_name = "x".repeat(65);
        assert!(encode(&header, b"").is_err());
    }

    #[test]
    fn rejects_universe_zero_on_encode() {
        let mut header = sample();
        header.universe = 0;
        assert!(encode(&header, b"").is_err());
    }

    #[test]
    fn drops_universe_out_of_range_on_decode() {
        let mut header = sample();
        header.universe = 6001;
        let mut encoded = encode(&header, b"").unwrap();
        let universe_offset = 6 + 64 + 1 + 2 + 1 + 1;
        encoded[universe_offset..universe_offset + 2].copy_from_slice(&64000u16.to_be_bytes());
        assert!(matches!(decode(&encoded), Err(WireError::FieldOutOfRange { .. })));
    }

    #[test]
    fn header_length_matches_spec_arithmetic() {
        // flags_len(2) + vector(4) + source(64) + priority(1) + sync(2)
        // + sequence(1) + options(1) + universe(2) == 77
        assert_eq!(HEADER_LEN, 77);
    }
}
