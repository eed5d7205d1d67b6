//! Raw and mapped product listings.

pub mod service;

pub use service::{ProductFilter, ProductService};
