//! Storage provider trait for uploaded feed files.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for feed file storage backends.
///
/// Paths are `/`-separated and relative to the provider root, e.g.
/// `supplier-feeds/{workspace_id}/{supplier_id}/feed.csv`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Read at most `limit` bytes from the start of a file.
    async fn read_prefix(&self, path: &str, limit: usize) -> AppResult<Bytes>;

    /// Write bytes to a file at the given path, replacing any previous content.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file at the given path.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether a file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
