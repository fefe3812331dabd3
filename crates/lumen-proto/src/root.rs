//! Root layer: ACN preamble + CID, wrapping a framing-layer payload.

use crate::{
    cid::Cid,
    errors::{Result, WireError},
    pdu::{decode_flags_length, encode_flags_length},
};

const LAYER: &str = "root";

/// Root PDU vector selecting "this is E1.31 data".
pub const VECTOR_ROOT_E131_DATA: u32 = 0x0000_0004;

/// Preamble size field value (bytes 0-1 of every datagram).
const PREAMBLE_SIZE: u16 = 0x0010;
/// Postamble size field value (bytes 2-3); E1.31 never uses a postamble.
const POSTAMBLE_SIZE: u16 = 0x0000;
/// ACN packet identifier: "ASC-E1.17" padded with three trailing nulls.
const ACN_PACKET_IDENTIFIER: [u8; 12] =
    [0x41, 0x53, 0x43, 0x2d, 0x45, 0x31, 0x2e, 0x31, 0x37, 0x00, 0x00, 0x00];

/// Full 16-byte ACN preamble preceding the outermost PDU.
const PREAMBLE_LEN: usize = 16;
/// Root PDU header size (flags+length, vector, CID) not counting the preamble.
const ROOT_HEADER_LEN: usize = 2 + 4 + 16;

/// Root-layer header: carries the sender's CID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootHeader {
    /// The sending node's component identifier.
    pub cid: Cid,
}

/// Encode the preamble + root PDU header around `payload`, returning the
/// complete datagram bytes.
pub fn encode(header: RootHeader, payload: &[u8]) -> Result<Vec<u8>> {
    let root_pdu_len = ROOT_HEADER_LEN + payload.len();
    let root_pdu_len_u16 =
        u16::try_from(root_pdu_len).map_err(|_| WireError::FieldOutOfRange {
            field: "root.pdu_len",
            value: root_pdu_len as u32,
        })?;

    let mut out = Vec::with_capacity(PREAMBLE_LEN + root_pdu_len);
    out.extend_from_slice(&PREAMBLE_SIZE.to_be_bytes());
    out.extend_from_slice(&POSTAMBLE_SIZE.to_be_bytes());
    out.extend_from_slice(&ACN_PACKET_IDENTIFIER);
    out.extend_from_slice(&encode_flags_length(root_pdu_len_u16)?);
    out.extend_from_slice(&VECTOR_ROOT_E131_DATA.to_be_bytes());
    out.extend_from_slice(header.cid.as_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode the preamble and root PDU header from a full datagram.
///
/// Returns the parsed header and the remaining bytes (the framing-layer
/// payload).
pub fn decode(bytes: &[u8]) -> Result<(RootHeader, &[u8])> {
    if bytes.len() < PREAMBLE_LEN {
        return Err(WireError::HeaderTooShort {
            layer: LAYER,
            expected: PREAMBLE_LEN,
            actual: bytes.len(),
        });
    }

    let preamble_size = u16::from_be_bytes([bytes[0], bytes[1]]);
    let postamble_size = u16::from_be_bytes([bytes[2], bytes[3]]);
    if preamble_size != PREAMBLE_SIZE
        || postamble_size != POSTAMBLE_SIZE
        || bytes[4..16] != ACN_PACKET_IDENTIFIER
    {
        return Err(WireError::PreambleMismatch);
    }

    let rest = &bytes[PREAMBLE_LEN..];
    if rest.len() < ROOT_HEADER_LEN {
        return Err(WireError::HeaderTooShort {
            layer: LAYER,
            expected: ROOT_HEADER_LEN,
            actual: rest.len(),
        });
    }

    let (_, declared_len) =
        decode_flags_length([rest[0], rest[1]], LAYER).map_err(|e| match e {
            WireError::BadFlags { flags, .. } => WireError::BadFlags { layer: LAYER, flags },
            other => other,
        })?;
    let declared_len = declared_len as usize;

    if declared_len < ROOT_HEADER_LEN {
        return Err(WireError::DeclaredLengthTooShort { layer: LAYER, declared: declared_len });
    }
    if declared_len > rest.len() {
        return Err(WireError::DeclaredLengthExceedsBuffer {
            layer: LAYER,
            declared: declared_len,
            remaining: rest.len(),
        });
    }

    let vector = u32::from_be_bytes([rest[2], rest[3], rest[4], rest[5]]);
    if vector != VECTOR_ROOT_E131_DATA {
        return Err(WireError::UnknownVector { layer: LAYER, vector });
    }

    let mut cid_bytes = [0u8; 16];
    cid_bytes.copy_from_slice(&rest[6..22]);
    let header = RootHeader { cid: Cid::new(cid_bytes) };

    // Payload runs from the end of the root header to the declared end of
    // this PDU; trailing bytes beyond declared_len are ignored.
    let payload = &rest[ROOT_HEADER_LEN..declared_len];
    Ok((header, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let header = RootHeader { cid: Cid::new([7u8; 16]) };
        let datagram = encode(header, b"hello").unwrap();
        let (decoded, payload) = decode(&datagram).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn rejects_bad_preamble() {
        let mut datagram = encode(RootHeader { cid: Cid::ZERO }, b"x").unwrap();
        datagram[0] = 0xFF;
        assert_eq!(decode(&datagram), Err(WireError::PreambleMismatch));
    }

    #[test]
    fn rejects_truncated_datagram() {
        let datagram = encode(RootHeader { cid: Cid::ZERO }, b"hello").unwrap();
        let truncated = &datagram[..datagram.len() - 2];
        assert!(matches!(
            decode(truncated),
            Err(WireError::DeclaredLengthExceedsBuffer { .. })
        ));
    }

    #[test]
    fn rejects_unknown_vector() {
        let mut datagram = encode(RootHeader { cid: Cid::ZERO }, b"hello").unwrap();
        datagram[18..22].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());
        assert!(matches!(decode(&datagram), Err(WireError::UnknownVector { .. })));
    }
}
