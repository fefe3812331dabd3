//! Typed errors for the node facade and SLP store.

use thiserror::Error;

/// Errors from `E131Node` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A universe number fell outside `[1, 63999]`.
    #[error("universe {universe} out of range")]
    UniverseOutOfRange {
        /// The rejected universe number.
        universe: u32,
    },

    /// A source name was empty or exceeded 64 bytes.
    #[error("source name invalid: {reason}")]
    InvalidSourceName {
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// An operation was attempted on a node that has not been started, or
    /// has been stopped.
    #[error("node is not running")]
    NotRunning,

    /// The underlying transport failed on a single send or receive.
    ///
    /// Logged by the caller; does not stop the node.
    #[error("transient transport failure: {0}")]
    TransportTransient(String),
}

/// Errors from `SlpStore` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlpError {
    /// An insert or remove targeted a service-type bucket whose established
    /// scope set differs from the request's.
    #[error("scope mismatch for service type {service_type}")]
    ScopeMismatch {
        /// The service-type prefix of the offending URL.
        service_type: String,
    },

    /// A scope token was empty after trimming.
    #[error("empty scope token in {raw:?}")]
    EmptyScopeToken {
        /// The raw scope string that produced the empty token.
        raw: String,
    },

    /// A URL had no `://` separator, so no service type could be derived.
    #[error("url {url:?} has no service-type prefix")]
    MissingServiceType {
        /// The offending URL.
        url: String,
    },
}
