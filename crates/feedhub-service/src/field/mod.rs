//! Workspace custom fields.

pub mod service;

pub use service::{CreateFieldRequest, FieldService};
