//! Raw and mapped product rows.

pub mod mapped;
pub mod raw;

pub use mapped::{MappedProduct, NewMappedProduct};
pub use raw::{NewRawProduct, RawProduct};
