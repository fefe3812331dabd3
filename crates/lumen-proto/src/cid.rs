//! Component Identifier: a 16-octet value naming a sender.

use std::fmt;

/// Opaque 16-octet component identifier.
///
/// Generated as a universally-unique value at node construction. Comparable
/// and hashable so it can key per-source arbitration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid([u8; 16]);

impl Cid {
    /// All-zero CID, used in tests and as a sentinel.
    pub const ZERO: Self = Self([0u8; 16]);

    /// Wrap a raw 16-byte identifier.
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh CID from cryptographically secure randomness.
    ///
    /// # Panics
    ///
    /// Panics if the OS RNG fails. A node that cannot source entropy for its
    /// own identity cannot operate correctly, so failure here is unrecoverable.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes).expect("invariant: OS RNG failure is unrecoverable");
        Self(bytes)
    }

    /// Raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for Cid {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_values() {
        assert_ne!(Cid::generate(), Cid::generate());
    }

    #[test]
    fn zero_is_all_zero_bytes() {
        assert_eq!(Cid::ZERO.as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn display_formats_as_hyphenated_hex() {
        let cid = Cid::new([0x01; 16]);
        assert_eq!(cid.to_string(), "01010101-0101-0101-0101-010101010101");
    }
}
