//! Structured value codec.
//!
//! Converts between JSON values and typed records described by a static
//! [`Shape`]. Records distinguish absent from `null` optional fields
//! ([`Field`]), keep unknown enum values ([`wire_enum!`]) and, when declared
//! extensible, carry undeclared keys through a decode/encode round trip
//! ([`Custom`]).

pub mod error;
pub mod field;
pub mod macros;
pub mod shape;
pub mod wire;

pub use error::{CodecError, json_kind};
pub use field::Field;
pub use shape::{FieldSpec, ObjectReader, ObjectWriter, Presence, Record, Shape};
pub use wire::{Custom, WireValue, hash_json};

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
