//! Protocol conversion traits and types.
//!
//! Provider wire types convert to and from the crate's own request and
//! response types (`GenerativeRequest`, `GenerativeResponse`).

mod errors;
pub mod gemini;

pub use errors::{ProtocolError, ProtocolResult};

/// Convert a provider-specific type into an internal type.
pub trait FromProvider<T>: Sized {
    fn from_provider(value: T) -> ProtocolResult<Self>;
}

/// Convert an internal type into a provider-specific type.
pub trait ToProvider<T>: Sized {
    fn to_provider(&self) -> ProtocolResult<T>;
}
