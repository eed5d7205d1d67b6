//! # feedhub-storage
//!
//! Storage for uploaded supplier feed files. A local filesystem provider
//! implements [`feedhub_core::traits::storage::StorageProvider`]; the
//! [`FeedStore`] lays files out under the feeds bucket.

pub mod providers;
pub mod store;

pub use providers::LocalStorageProvider;
pub use store::FeedStore;
