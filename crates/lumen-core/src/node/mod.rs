//! E1.31 node facade: per-universe tx/rx state and source arbitration.

mod facade;
mod rx;
mod tx;

pub use facade::{DatagramOutcome, E131Node};
pub use rx::{ArbitrationOutcome, Handler, ARBITRATION_TIMEOUT};
pub use tx::{TxUniverse, DEFAULT_PRIORITY, MAX_PRIORITY};
