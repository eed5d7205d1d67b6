//! Layout of uploaded supplier feeds in storage.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use feedhub_core::result::AppResult;
use feedhub_core::traits::storage::StorageProvider;

/// Stores supplier feed files under `{bucket}/{workspace}/{supplier}/`.
#[derive(Debug, Clone)]
pub struct FeedStore {
    provider: Arc<dyn StorageProvider>,
    bucket: String,
}

impl FeedStore {
    /// Create a store writing into `bucket` of `provider`.
    pub fn new(provider: Arc<dyn StorageProvider>, bucket: impl Into<String>) -> Self {
        Self {
            provider,
            bucket: bucket.into(),
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Storage path for an uploaded file of a supplier.
    pub fn feed_path(&self, workspace_id: Uuid, supplier_id: Uuid, file_name: &str) -> String {
        format!(
            "{}/{workspace_id}/{supplier_id}/{}",
            self.bucket,
            sanitize_file_name(file_name)
        )
    }

    /// Persist an uploaded feed and return its storage path.
    pub async fn save_upload(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        file_name: &str,
        data: Bytes,
    ) -> AppResult<String> {
        let path = self.feed_path(workspace_id, supplier_id, file_name);
        let size = data.len();
        self.provider.write(&path, data).await?;
        info!(%workspace_id, %supplier_id, path = %path, bytes = size, "Stored feed upload");
        Ok(path)
    }

    /// Read a stored feed in full.
    pub async fn read(&self, path: &str) -> AppResult<Bytes> {
        self.provider.read_bytes(path).await
    }

    /// Read the first `limit` bytes of a stored feed.
    pub async fn read_sample(&self, path: &str, limit: usize) -> AppResult<Bytes> {
        self.provider.read_prefix(path, limit).await
    }

    /// Remove a stored feed; missing files are ignored.
    pub async fn remove(&self, path: &str) -> AppResult<()> {
        self.provider.delete(path).await
    }
}

/// Reduce a client-supplied file name to a safe single path segment,
/// keeping its extension for type detection.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "feed".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LocalStorageProvider;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("products.csv"), "products.csv");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\feeds\\my feed.xml"), "my_feed.xml");
        assert_eq!(sanitize_file_name(".."), "feed");
        assert_eq!(sanitize_file_name(""), "feed");
    }

    #[tokio::test]
    async fn test_save_upload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        let store = FeedStore::new(Arc::new(provider), "supplier-feeds");
        let ws = Uuid::new_v4();
        let supplier = Uuid::new_v4();

        let path = store
            .save_upload(ws, supplier, "feed.csv", Bytes::from("sku\nA1\n"))
            .await
            .unwrap();
        assert_eq!(path, format!("supplier-feeds/{ws}/{supplier}/feed.csv"));
        assert_eq!(store.read(&path).await.unwrap(), Bytes::from("sku\nA1\n"));
        assert_eq!(store.read_sample(&path, 3).await.unwrap(), Bytes::from("sku"));
    }
}
