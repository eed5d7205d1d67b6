//! HTTP request handlers organized by domain.

pub mod category;
pub mod export;
pub mod feed;
pub mod field;
pub mod health;
pub mod ingestion;
pub mod mapping;
pub mod product;
pub mod supplier;
pub mod workspace;
