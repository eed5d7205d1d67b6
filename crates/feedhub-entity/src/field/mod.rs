//! Custom schema fields and supplier field mappings.

pub mod custom;
pub mod mapping;

pub use custom::{CreateCustomField, CustomField, UpdateCustomField, is_valid_field_key};
pub use mapping::{FieldMapping, NewFieldMapping, TransformType};
