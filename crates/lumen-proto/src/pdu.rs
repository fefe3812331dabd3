//! Generic PDU flags+length header shared by every layer.
//!
//! Each PDU carries a 2-octet header: the top 3 bits are flags (always
//! `0x7` for the protocols in scope) and the lower 12 bits are the PDU
//! length, *including this 2-byte header itself*.

use crate::errors::{Result, WireError};

/// The 3-bit flags value every PDU in this stack must carry.
pub const FLAGS: u8 = 0x7;

/// Maximum value the 12-bit length field can hold.
pub const MAX_LENGTH: u16 = 0x0FFF;

/// Encode a flags+length header for a PDU of the given total length.
///
/// # Errors
///
/// Returns [`WireError::FieldOutOfRange`] if `length` doesn't fit in 12 bits.
pub fn encode_flags_length(length: u16) -> Result<[u8; 2]> {
    if length > MAX_LENGTH {
        return Err(WireError::FieldOutOfRange { field: "pdu.length", value: u32::from(length) });
    }
    let word = (u16::from(FLAGS) << 12) | length;
    Ok(word.to_be_bytes())
}

/// Decode a flags+length header, validating the flags bits.
///
/// Returns `(flags, length)` where `length` includes the 2-byte header.
pub fn decode_flags_length(bytes: [u8; 2], layer: &'static str) -> Result<(u8, u16)> {
    let word = u16::from_be_bytes(bytes);
    let flags = (word >> 12) as u8;
    let length = word & MAX_LENGTH;
    if flags != FLAGS {
        return Err(WireError::BadFlags { layer, flags });
    }
    Ok((flags, length))
}
