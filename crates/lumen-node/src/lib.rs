//! Production runtime for the E1.31 node: UDP/multicast transport and a
//! `SystemEnv` clock, driven by the sans-IO `lumen_core::E131Node`.

pub mod error;
pub mod system_env;
pub mod transport;

pub use error::TransportError;
pub use system_env::SystemEnv;
pub use transport::Transport;
