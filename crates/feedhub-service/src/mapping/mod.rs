//! Field mappings and the mapping/coercion run.

pub mod service;

pub use service::{MappingResult, MappingService};
