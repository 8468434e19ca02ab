//! Message values and the wire envelope.
//!
//! # Components
//!
//! - [`Value`] - the closed algebra of transportable values
//! - [`Binary`] - opaque byte-string wrapper, base64 on the wire
//! - [`codec`] - JSON envelope with reserved tags for addresses and binaries
//!
//! Every cast runs a full encode/decode round trip, even in-process; the
//! envelope is the isolation boundary between sender and receiver heaps.

pub mod codec;
pub mod value;

pub use codec::{decode, encode, ADDRESS_KEY, BINARY_KEY};
pub use value::{Binary, Value};
