//! # feedhub-feed
//!
//! The transformation layer of the Supplier Feed Hub. Everything in this
//! crate is synchronous and side-effect free: it turns supplier feed bytes
//! into field maps and field maps into export documents.
//!
//! Pipeline: [`format`] detection, [`sniff`] (field names for the mapping
//! UI), [`parse`] (items with external ids), [`mapping`] and [`coerce`]
//! (schema-aligned rows) and finally [`export`].

pub mod coerce;
pub mod error;
pub mod export;
pub mod flatten;
pub mod format;
pub mod mapping;
pub mod parse;
pub mod sniff;

pub use coerce::FieldDatatype;
pub use error::FeedError;
pub use format::FeedFormat;

/// A free-form record of field name to JSON value, in insertion order.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Strip a leading UTF-8 byte order mark.
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}
