//! Supplier CRUD, feed uploads and key sniffing.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use feedhub_core::config::FeedConfig;
use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_core::types::{PageRequest, PageResponse};
use feedhub_database::repositories::SupplierRepository;
use feedhub_entity::FeedFormat;
use feedhub_entity::supplier::{
    CreateSupplier, FeedCredentials, SourceType, Supplier, SupplierStatus, SyncSchedule,
    UpdateSupplier,
};
use feedhub_feed::format::detect_feed_type;
use feedhub_feed::sniff::sniff_keys;

use crate::context::RequestContext;
use crate::fetch::parse_feed_url;
use crate::supplier::source::FeedSourceLoader;

/// Request to create a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupplierRequest {
    /// Display name.
    pub name: String,
    /// URL or upload.
    pub source_type: SourceType,
    /// Feed URL, required for `url` suppliers.
    pub endpoint_url: Option<String>,
    /// Pinned feed format.
    pub feed_type: Option<FeedFormat>,
    /// Endpoint credentials.
    pub credentials: Option<FeedCredentials>,
    /// Source key holding the unique item identifier.
    pub unique_key: String,
    /// Sync schedule, manual by default.
    pub schedule: Option<SyncSchedule>,
}

/// Keys found in a feed sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SniffResult {
    /// Format the sample was read as.
    pub feed_type: FeedFormat,
    /// Field names, first-seen order.
    pub keys: Vec<String>,
    /// Whether the sample was cut short.
    pub truncated: bool,
}

/// Manages suppliers.
#[derive(Debug, Clone)]
pub struct SupplierService {
    /// Supplier repository.
    supplier_repo: Arc<SupplierRepository>,
    /// Feed source access.
    loader: Arc<FeedSourceLoader>,
    /// Feed limits.
    config: FeedConfig,
    /// Maximum accepted upload size.
    max_upload_bytes: u64,
}

impl SupplierService {
    /// Creates a new supplier service.
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        loader: Arc<FeedSourceLoader>,
        config: FeedConfig,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            supplier_repo,
            loader,
            config,
            max_upload_bytes,
        }
    }

    /// Create a supplier in the active workspace.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateSupplierRequest,
    ) -> AppResult<Supplier> {
        ctx.require_editor()?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Supplier name cannot be empty"));
        }
        let unique_key = req.unique_key.trim();
        if unique_key.is_empty() {
            return Err(AppError::validation("Unique identifier key cannot be empty"));
        }
        let endpoint_url = normalize_url(req.endpoint_url)?;
        if req.source_type == SourceType::Url && endpoint_url.is_none() {
            return Err(AppError::validation("URL suppliers require an endpoint URL"));
        }
        let credentials = req.credentials.unwrap_or_default();
        credentials.validate().map_err(AppError::validation)?;

        let supplier = self
            .supplier_repo
            .create(&CreateSupplier {
                workspace_id: ctx.workspace_id,
                name: name.to_string(),
                source_type: req.source_type,
                endpoint_url,
                feed_type: req.feed_type,
                credentials,
                unique_key: unique_key.to_string(),
                schedule: req.schedule.unwrap_or_default(),
            })
            .await?;

        info!(
            workspace_id = %ctx.workspace_id,
            supplier_id = %supplier.id,
            source_type = %supplier.source_type.as_str(),
            "Supplier created"
        );
        Ok(supplier)
    }

    /// List suppliers of the active workspace.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<(Vec<Supplier>, PageResponse)> {
        self.supplier_repo.list(ctx.workspace_id, page).await
    }

    /// Get a supplier of the active workspace.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Supplier> {
        self.supplier_repo
            .find(ctx.workspace_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut req: UpdateSupplier,
    ) -> AppResult<Supplier> {
        ctx.require_editor()?;

        if let Some(name) = req.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Supplier name cannot be empty"));
            }
        }
        if let Some(key) = req.unique_key.as_mut() {
            *key = key.trim().to_string();
            if key.is_empty() {
                return Err(AppError::validation("Unique identifier key cannot be empty"));
            }
        }
        if req.status == Some(SupplierStatus::Error) {
            return Err(AppError::validation("Status can only be set to active or paused"));
        }
        if let Some(credentials) = &req.credentials {
            credentials.validate().map_err(AppError::validation)?;
        }
        if let Some(url) = req.endpoint_url.take() {
            req.endpoint_url = normalize_url(Some(url))?;
        }

        let supplier = self
            .supplier_repo
            .update(ctx.workspace_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))?;

        if supplier.source_type == SourceType::Url && !supplier.has_source() {
            warn!(supplier_id = %supplier.id, "URL supplier has no endpoint");
        }
        info!(workspace_id = %ctx.workspace_id, supplier_id = %id, "Supplier updated");
        Ok(supplier)
    }

    /// Delete a supplier with its runs, mappings and products.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_editor()?;
        let supplier = self.get(ctx, id).await?;

        if !self.supplier_repo.delete(ctx.workspace_id, id).await? {
            return Err(AppError::not_found("Supplier not found"));
        }

        if let Some(path) = supplier.storage_path.as_deref() {
            if let Err(e) = self.loader.store().remove(path).await {
                warn!(supplier_id = %id, path, error = %e, "Failed to remove stored feed");
            }
        }
        info!(workspace_id = %ctx.workspace_id, supplier_id = %id, "Supplier deleted");
        Ok(())
    }

    /// Store an uploaded feed file for an upload supplier.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        file_name: &str,
        data: Bytes,
    ) -> AppResult<Supplier> {
        ctx.require_editor()?;
        let supplier = self.get(ctx, id).await?;

        if supplier.source_type != SourceType::Upload {
            return Err(AppError::validation("Only upload suppliers accept feed files"));
        }
        if data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if data.len() as u64 > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "Uploaded file exceeds {} bytes",
                self.max_upload_bytes
            )));
        }

        let path = self
            .loader
            .store()
            .save_upload(ctx.workspace_id, id, file_name, data)
            .await?;
        let updated = self
            .supplier_repo
            .set_storage_path(ctx.workspace_id, id, &path)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))?;

        if let Some(old) = supplier.storage_path.as_deref().filter(|old| *old != path) {
            if let Err(e) = self.loader.store().remove(old).await {
                warn!(supplier_id = %id, path = old, error = %e, "Failed to remove previous upload");
            }
        }
        Ok(updated)
    }

    /// Sniff field names from an arbitrary feed URL.
    pub async fn sniff_url(
        &self,
        url: &str,
        feed_type: Option<FeedFormat>,
        credentials: &FeedCredentials,
    ) -> AppResult<SniffResult> {
        credentials.validate().map_err(AppError::validation)?;
        let fetched = self
            .loader
            .fetcher()
            .fetch_sample(url, credentials, self.config.sample_bytes)
            .await?;
        let format = feed_type.unwrap_or_else(|| {
            detect_feed_type(Some(url), fetched.content_type.as_deref(), Some(&fetched.bytes))
        });
        self.sniff_bytes(format, &fetched.bytes, fetched.truncated)
    }

    /// Sniff field names from a supplier's configured source.
    pub async fn sniff_supplier(&self, ctx: &RequestContext, id: Uuid) -> AppResult<SniffResult> {
        let supplier = self.get(ctx, id).await?;
        let sample = self
            .loader
            .sample(&supplier, self.config.sample_bytes)
            .await?;
        self.sniff_bytes(sample.format, &sample.bytes, sample.truncated)
    }

    fn sniff_bytes(
        &self,
        format: FeedFormat,
        sample: &[u8],
        truncated: bool,
    ) -> AppResult<SniffResult> {
        let keys = sniff_keys(format, sample, self.config.sniff_key_limit);
        if keys.is_empty() {
            return Err(AppError::validation("Could not extract keys from the feed"));
        }
        Ok(SniffResult {
            feed_type: format,
            keys,
            truncated,
        })
    }
}

/// Trim a URL, mapping blank to `None` and rejecting non-HTTP URLs.
fn normalize_url(url: Option<String>) -> AppResult<Option<String>> {
    match url.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) => {
            parse_feed_url(url)?;
            Ok(Some(url.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url(None).unwrap(), None);
        assert_eq!(normalize_url(Some("   ".into())).unwrap(), None);
        assert_eq!(
            normalize_url(Some(" https://a.test/feed.xml ".into())).unwrap(),
            Some("https://a.test/feed.xml".to_string())
        );
        assert!(normalize_url(Some("file:///etc/passwd".into())).is_err());
    }
}
