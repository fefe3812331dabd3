//! DMP layer (`DMPE131Inflator`): addressing header + start code + DMX slots.

use crate::{
    dmx::{DmxBuffer, MAX_SLOTS},
    errors::{Result, WireError},
    pdu::{decode_flags_length, encode_flags_length},
};

const LAYER: &str = "dmp";

/// DMP PDU vector for "set property" (the only operation E1.31 DMX uses).
pub const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;

const ADDR_TYPE_DATA_TYPE: u8 = 0xA1;
const FIRST_PROPERTY_ADDRESS: u16 = 0x0000;
const ADDRESS_INCREMENT: u16 = 0x0001;

/// Header size up to and including the property count field.
const FIXED_HEADER_LEN: usize = 2 + 1 + 1 + 2 + 2 + 2;

/// Maximum property count: start code + 512 slots.
pub const MAX_PROPERTY_COUNT: u16 = 513;

/// Parsed DMP payload: the start code byte plus 0..512 DMX slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmpPayload {
    /// First byte of the property data (0x00 = standard DMX512).
    pub start_code: u8,
    /// DMX slot data following the start code.
    pub slots: DmxBuffer,
}

/// Encode a DMP PDU carrying `start_code` followed by `slots`.
pub fn encode(start_code: u8, slots: &DmxBuffer) -> Result<Vec<u8>> {
    if slots.len() > MAX_SLOTS {
        return Err(WireError::FieldOutOfRange {
            field: "dmp.slots",
            value: slots.len() as u32,
        });
    }

    let property_count = 1 + slots.len();
    let pdu_len = FIXED_HEADER_LEN + property_count;
    let pdu_len_u16 = u16::try_from(pdu_len)
        .map_err(|_| WireError::FieldOutOfRange { field: "dmp.pdu_len", value: pdu_len as u32 })?;
    let property_count_u16 = u16::try_from(property_count)
        .map_err(|_| WireError::FieldOutOfRange { field: "dmp.property_count", value: property_count as u32 })?;

    let mut out = Vec::with_capacity(pdu_len);
    out.extend_from_slice(&encode_flags_length(pdu_len_u16)?);
    out.push(VECTOR_DMP_SET_PROPERTY);
    out.push(ADDR_TYPE_DATA_TYPE);
    out.extend_from_slice(&FIRST_PROPERTY_ADDRESS.to_be_bytes());
    out.extend_from_slice(&ADDRESS_INCREMENT.to_be_bytes());
    out.extend_from_slice(&property_count_u16.to_be_bytes());
    out.push(start_code);
    out.extend_from_slice(slots.as_slice());
    Ok(out)
}

/// Decode a DMP PDU. This is the innermost layer: there is no further
/// payload to hand off.
pub fn decode(bytes: &[u8]) -> Result<DmpPayload> {
    if bytes.len() < FIXED_HEADER_LEN {
        return Err(WireError::HeaderTooShort {
            layer: LAYER,
            expected: FIXED_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let (_, declared_len) =
        decode_flags_length([bytes[0], bytes[1]], LAYER).map_err(|e| match e {
            WireError::BadFlags { flags, .. } => WireError::BadFlags { layer: LAYER, flags },
            other => other,
        })?;
    let declared_len = declared_len as usize;

    if declared_len < FIXED_HEADER_LEN {
        return Err(WireError::DeclaredLengthTooShort { layer: LAYER, declared: declared_len });
    }
    if declared_len > bytes.len() {
        return Err(WireError::DeclaredLengthExceedsBuffer {
            layer: LAYER,
            declared: declared_len,
            remaining: bytes.len(),
        });
    }

    let vector = bytes[2];
    if vector != VECTOR_DMP_SET_PROPERTY {
        return Err(WireError::UnknownVector { layer: LAYER, vector: u32::from(vector) });
    }

    let addr_type = bytes[3];
    if addr_type != ADDR_TYPE_DATA_TYPE {
        return Err(WireError::FieldOutOfRange {
            field: "dmp.addr_type",
            value: u32::from(addr_type),
        });
    }

    let first_property = u16::from_be_bytes([bytes[4], bytes[5]]);
    if first_property != FIRST_PROPERTY_ADDRESS {
        return Err(WireError::FieldOutOfRange {
            field: "dmp.first_property",
            value: u32::from(first_property),
        });
    }

    let increment = u16::from_be_bytes([bytes[6], bytes[7]]);
    if increment != ADDRESS_INCREMENT {
        return Err(WireError::FieldOutOfRange {
            field: "dmp.address_increment",
            value: u32::from(increment),
        });
    }

    let property_count = u16::from_be_bytes([bytes[8], bytes[9]]);
    if property_count > MAX_PROPERTY_COUNT {
        return Err(WireError::FieldOutOfRange {
            field: "dmp.property_count",
            value: u32::from(property_count),
        });
    }
    if property_count == 0 {
        return Err(WireError::FieldOutOfRange { field: "dmp.property_count", value: 0 });
    }

    let property_data = &bytes[FIXED_HEADER_LEN..declared_len];
    let available = property_data.len().min((property_count as usize).saturating_sub(0));
    if available == 0 {
        return Err(WireError::HeaderTooShort { layer: LAYER, expected: 1, actual: 0 });
    }

    let start_code = property_data[0];
    let slot_count = (property_count as usize - 1).min(property_data.len().saturating_sub(1));
    let slots = DmxBuffer::from_slice(&property_data[1..1 + slot_count])?;

    Ok(DmpPayload { start_code, slots })
}
