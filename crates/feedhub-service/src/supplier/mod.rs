//! Supplier management and feed source access.

pub mod service;
pub mod source;

pub use service::{CreateSupplierRequest, SniffResult, SupplierService};
pub use source::{FeedSourceLoader, LoadedFeed};
