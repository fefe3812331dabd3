//! Wire-format error types.
//!
//! These never reach a caller directly — see `lumen_core::NodeError` for the
//! typed results returned by node/store operations. A `WireError` is an
//! observability signal: the frame that produced it is dropped and a counter
//! is incremented by the layer that caught it.

use thiserror::Error;

/// Structural or semantic failure while decoding a PDU layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The 16-byte ACN preamble did not match.
    #[error("preamble mismatch")]
    PreambleMismatch,

    /// Fewer bytes were available than the layer's fixed header requires.
    #[error("{layer} header too short: need {expected} bytes, got {actual}")]
    HeaderTooShort {
        /// Layer name ("root", "framing", "dmp").
        layer: &'static str,
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The top 3 bits of a PDU's flags+length field were not `0x7`.
    #[error("{layer} flags {flags:#05b} != 0x7")]
    BadFlags {
        /// Layer name.
        layer: &'static str,
        /// Observed 3-bit flags value.
        flags: u8,
    },

    /// A PDU's declared length exceeds the bytes remaining in the buffer.
    #[error("{layer} declared length {declared} exceeds remaining {remaining} bytes")]
    DeclaredLengthExceedsBuffer {
        /// Layer name.
        layer: &'static str,
        /// Length the PDU header claims.
        declared: usize,
        /// Bytes actually remaining.
        remaining: usize,
    },

    /// A PDU's declared total length was smaller than its own header.
    #[error("{layer} declared length {declared} is shorter than the {layer} header")]
    DeclaredLengthTooShort {
        /// Layer name.
        layer: &'static str,
        /// Length the PDU header claims.
        declared: usize,
    },

    /// The vector field selected an inner payload type this layer doesn't
    /// recognize.
    #[error("unrecognized {layer} vector {vector:#010x}")]
    UnknownVector {
        /// Layer name.
        layer: &'static str,
        /// Raw vector value observed on the wire.
        vector: u32,
    },

    /// A fixed header field was outside the range the standard allows.
    #[error("{field} out of range: {value}")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Observed value (formatted by the caller).
        value: u32,
    },
}

/// Result type used throughout the wire codec.
pub type Result<T> = std::result::Result<T, WireError>;
