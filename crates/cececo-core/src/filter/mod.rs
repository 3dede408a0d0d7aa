//! Filter state, its query-string codec, and the store that keeps both in
//! sync with a [`Location`].

pub mod codec;
pub mod state;
pub mod store;

pub use codec::UrlCodec;
pub use state::{FilterField, FilterState};
pub use store::{FilterStore, Location, MemoryLocation};
