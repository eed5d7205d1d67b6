//! # feedhub-entity
//!
//! Domain entity models for the Supplier Feed Hub. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod category;
pub mod export;
pub mod field;
pub mod ingestion;
pub mod product;
pub mod supplier;
pub mod workspace;

pub use feedhub_feed::{FeedFormat, FieldDatatype};
