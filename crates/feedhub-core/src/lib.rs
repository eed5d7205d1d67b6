//! # feedhub-core
//!
//! Core crate for the Supplier Feed Hub. Contains configuration schemas,
//! the unified error system, pagination types, and the storage trait
//! implemented by `feedhub-storage`.
//!
//! This crate has **no** internal dependencies on other FeedHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
