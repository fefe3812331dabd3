//! Wire format for ANSI E1.31 (sACN) streaming DMX: PDU framing, CID, and
//! the DMX512 payload buffer.
//!
//! This crate is sans-IO: it only encodes and decodes byte buffers. Socket
//! handling, arbitration and scheduling live in `lumen-core` and
//! `lumen-node`.

pub mod cid;
pub mod dmp;
pub mod dmx;
pub mod errors;
pub mod frame;
pub mod framing;
pub mod pdu;
pub mod root;

pub use cid::Cid;
pub use dmx::DmxBuffer;
pub use errors::{Result, WireError};
pub use frame::DataFrame;
pub use framing::FramingHeader;
pub use root::RootHeader;
