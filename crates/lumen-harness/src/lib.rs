//! Deterministic test harness for the E1.31 node and SLP store.

pub mod mock_env;
pub mod scenario;

pub use mock_env::{MockEnv, MockInstant};
