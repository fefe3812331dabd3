//! Transport-layer errors: socket and multicast-group failures.

use thiserror::Error;

/// Errors from the UDP/multicast transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Bind or socket-creation failure. `Start()` aborts; the node remains
    /// stopped.
    #[error("transport bind failed: {0}")]
    Fatal(#[source] std::io::Error),

    /// A single send or receive failed. Logged and reported to the caller;
    /// the node keeps running.
    #[error("transient transport failure: {0}")]
    Transient(#[source] std::io::Error),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Transient(err)
    }
}
