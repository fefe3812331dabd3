//! RFC 2608 SLP service/URL store.

mod scope;
mod store;

pub use scope::ScopeSet;
pub use store::{AddDuration, ServiceEntry, SlpStore, UrlEntry};
