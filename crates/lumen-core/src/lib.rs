//! Sans-IO core: the `Environment` clock abstraction, the E1.31 node
//! facade, and the SLP service store. No sockets, no async runtime beyond
//! the `sleep` hook on `Environment`.

pub mod env;
pub mod error;
pub mod node;
pub mod slp;

pub use env::Environment;
pub use error::{NodeError, SlpError};
pub use node::{DatagramOutcome, E131Node};
pub use slp::{ScopeSet, ServiceEntry, SlpStore, UrlEntry};
