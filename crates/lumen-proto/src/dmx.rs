//! DMX512 data buffer: up to 512 8-bit slots with an explicit logical length.

use crate::errors::{Result, WireError};

/// Maximum number of DMX slots in a universe.
pub const MAX_SLOTS: usize = 512;

/// An ordered sequence of up to 512 unsigned 8-bit slots plus a logical
/// length.
///
/// Copy is by value. An empty buffer (`len() == 0`) is distinct from 512
/// zeros — both are valid, representing "no data sent yet" versus
/// "512 slots, all blacked out".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmxBuffer {
    slots: Vec<u8>,
}

impl DmxBuffer {
    /// An empty buffer (logical length 0).
    #[must_use]
    pub fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    /// Build a buffer from a slice, rejecting slices longer than 512 bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.len() > MAX_SLOTS {
            return Err(WireError::FieldOutOfRange {
                field: "dmx_buffer.len",
                value: data.len() as u32,
            });
        }
        Ok(Self { slots: data.to_vec() })
    }

    /// Build a 512-slot buffer of all zeros.
    #[must_use]
    pub fn blackout() -> Self {
        Self { slots: vec![0u8; MAX_SLOTS] }
    }

    /// Logical length (0..=512).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if this buffer carries no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots as a byte slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.slots
    }
}

impl Default for DmxBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
