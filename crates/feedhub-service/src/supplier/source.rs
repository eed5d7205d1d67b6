//! Loading a supplier's feed from its URL or its stored upload.

use std::sync::Arc;

use bytes::Bytes;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_entity::FeedFormat;
use feedhub_entity::supplier::{SourceType, Supplier};
use feedhub_feed::format::detect_feed_type;
use feedhub_storage::FeedStore;

use crate::fetch::FeedFetcher;

/// Bytes of a supplier feed together with its resolved format.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    /// Document bytes.
    pub bytes: Bytes,
    /// Pinned or detected format.
    pub format: FeedFormat,
    /// Whether only a prefix was read.
    pub truncated: bool,
}

/// Reads supplier feeds from either source type.
#[derive(Debug, Clone)]
pub struct FeedSourceLoader {
    /// HTTP fetcher for `url` suppliers.
    fetcher: Arc<FeedFetcher>,
    /// Upload storage for `upload` suppliers.
    store: FeedStore,
    /// Bytes inspected for content-based detection.
    sample_bytes: usize,
}

impl FeedSourceLoader {
    /// Creates a new source loader.
    pub fn new(fetcher: Arc<FeedFetcher>, store: FeedStore, sample_bytes: usize) -> Self {
        Self {
            fetcher,
            store,
            sample_bytes,
        }
    }

    /// The HTTP fetcher.
    pub fn fetcher(&self) -> &Arc<FeedFetcher> {
        &self.fetcher
    }

    /// The upload store.
    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Load the full feed of a supplier.
    pub async fn load(&self, supplier: &Supplier) -> AppResult<LoadedFeed> {
        self.read(supplier, None).await
    }

    /// Load at most `limit` bytes of a supplier's feed.
    pub async fn sample(&self, supplier: &Supplier, limit: usize) -> AppResult<LoadedFeed> {
        self.read(supplier, Some(limit)).await
    }

    async fn read(&self, supplier: &Supplier, limit: Option<usize>) -> AppResult<LoadedFeed> {
        let (location, bytes, content_type, truncated) = match supplier.source_type {
            SourceType::Url => {
                let url = supplier
                    .endpoint_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| AppError::validation("Supplier has no feed URL"))?;
                let credentials = &supplier.credentials.0;
                let fetched = match limit {
                    Some(limit) => self.fetcher.fetch_sample(url, credentials, limit).await?,
                    None => self.fetcher.fetch(url, credentials).await?,
                };
                (url, fetched.bytes, fetched.content_type, fetched.truncated)
            }
            SourceType::Upload => {
                let path = supplier
                    .storage_path
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| AppError::validation("No feed file has been uploaded"))?;
                let bytes = match limit {
                    Some(limit) => self.store.read_sample(path, limit).await?,
                    None => self.store.read(path).await?,
                };
                let truncated = limit.is_some_and(|l| bytes.len() >= l);
                (path, bytes, None, truncated)
            }
        };

        let format = supplier.feed_type.unwrap_or_else(|| {
            let sample = &bytes[..bytes.len().min(self.sample_bytes)];
            detect_feed_type(Some(location), content_type.as_deref(), Some(sample))
        });

        Ok(LoadedFeed {
            bytes,
            format,
            truncated,
        })
    }
}
