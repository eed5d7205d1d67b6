//! Export profile CRUD, on-demand downloads and the public live feed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use feedhub_core::config::ServerConfig;
use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_database::repositories::{
    CustomFieldRepository, ExportProfileRepository, MappedProductRepository,
};
use feedhub_entity::FeedFormat;
use feedhub_entity::export::{
    CreateExportProfile, DeliveryMethod, ExportProfile, UpdateExportProfile,
};
use feedhub_feed::export::{ExportFilters, ExportRow, effective_fields, generate};

use crate::context::RequestContext;

/// Request to create an export profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExportRequest {
    /// Display name.
    pub name: String,
    /// Output format.
    pub format: FeedFormat,
    /// Field keys to include.
    #[serde(default)]
    pub field_selection: Vec<String>,
    /// Preferred key order.
    #[serde(default)]
    pub field_ordering: Vec<String>,
    /// Row filters.
    #[serde(default)]
    pub filters: ExportFilters,
    /// Delivery method, download by default.
    pub delivery_method: Option<DeliveryMethod>,
    /// Active flag, true by default.
    pub is_active: Option<bool>,
}

/// A rendered export document.
#[derive(Debug, Clone)]
pub struct GeneratedExport {
    /// Document bytes.
    pub body: Vec<u8>,
    /// Document format.
    pub format: FeedFormat,
    /// Suggested file name.
    pub file_name: String,
}

impl GeneratedExport {
    /// `Content-Type` of the document.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Manages export profiles and renders their documents.
#[derive(Debug, Clone)]
pub struct ExportService {
    export_repo: Arc<ExportProfileRepository>,
    field_repo: Arc<CustomFieldRepository>,
    mapped_repo: Arc<MappedProductRepository>,
    /// Server settings; the app origin builds live feed URLs.
    server: ServerConfig,
}

impl ExportService {
    /// Creates a new export service.
    pub fn new(
        export_repo: Arc<ExportProfileRepository>,
        field_repo: Arc<CustomFieldRepository>,
        mapped_repo: Arc<MappedProductRepository>,
        server: ServerConfig,
    ) -> Self {
        Self {
            export_repo,
            field_repo,
            mapped_repo,
            server,
        }
    }

    /// Public URL of a profile's live feed, for `feed` profiles.
    pub fn feed_url(&self, profile: &ExportProfile) -> Option<String> {
        (profile.delivery_method == DeliveryMethod::Feed).then(|| {
            self.server
                .feed_url(&profile.id.to_string(), profile.format.extension())
        })
    }

    /// Profiles of the active workspace.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<ExportProfile>> {
        self.export_repo.list(ctx.workspace_id).await
    }

    /// Get a profile.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ExportProfile> {
        self.export_repo
            .find(ctx.workspace_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Export profile not found"))
    }

    /// Create a profile.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateExportRequest,
    ) -> AppResult<ExportProfile> {
        ctx.require_editor()?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Export profile name cannot be empty"));
        }
        req.filters.validate().map_err(AppError::validation)?;

        let profile = self
            .export_repo
            .create(&CreateExportProfile {
                workspace_id: ctx.workspace_id,
                name: name.to_string(),
                format: req.format,
                field_selection: clean_keys(req.field_selection),
                field_ordering: clean_keys(req.field_ordering),
                filters: req.filters,
                delivery_method: req.delivery_method.unwrap_or_default(),
                is_active: req.is_active.unwrap_or(true),
            })
            .await?;
        info!(workspace_id = %ctx.workspace_id, profile_id = %profile.id, format = %profile.format, "Export profile created");
        Ok(profile)
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut req: UpdateExportProfile,
    ) -> AppResult<ExportProfile> {
        ctx.require_editor()?;
        if let Some(name) = req.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Export profile name cannot be empty"));
            }
        }
        if let Some(filters) = &req.filters {
            filters.validate().map_err(AppError::validation)?;
        }
        req.field_selection = req.field_selection.map(clean_keys);
        req.field_ordering = req.field_ordering.map(clean_keys);

        self.export_repo
            .update(ctx.workspace_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Export profile not found"))
    }

    /// Delete a profile.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_editor()?;
        if !self.export_repo.delete(ctx.workspace_id, id).await? {
            return Err(AppError::not_found("Export profile not found"));
        }
        info!(workspace_id = %ctx.workspace_id, profile_id = %id, "Export profile deleted");
        Ok(())
    }

    /// Render a profile's document for an authenticated download.
    pub async fn download(&self, ctx: &RequestContext, id: Uuid) -> AppResult<GeneratedExport> {
        let profile = self.get(ctx, id).await?;
        self.render(&profile).await
    }

    /// Render the public live feed of a profile.
    ///
    /// Unknown, inactive and download-only profiles are reported as not
    /// found, as is an extension that differs from the profile's format.
    pub async fn live_feed(
        &self,
        profile_id: Uuid,
        extension: Option<&str>,
    ) -> AppResult<GeneratedExport> {
        let profile = self
            .export_repo
            .find_public(profile_id)
            .await?
            .filter(ExportProfile::serves_live_feed)
            .ok_or_else(|| AppError::not_found("Feed not found"))?;

        if let Some(ext) = extension {
            if FeedFormat::from_extension(ext) != Some(profile.format) {
                return Err(AppError::not_found("Feed not found"));
            }
        }
        self.render(&profile).await
    }

    async fn render(&self, profile: &ExportProfile) -> AppResult<GeneratedExport> {
        let fields = self.field_repo.list(profile.workspace_id).await?;
        let visible: Vec<String> = fields
            .iter()
            .filter(|f| f.is_visible)
            .map(|f| f.key.clone())
            .collect();
        let keys = effective_fields(&profile.field_selection, &profile.field_ordering, &visible);

        let products = self.mapped_repo.list_for_export(profile.workspace_id).await?;
        let rows: Vec<ExportRow<'_>> = products
            .iter()
            .map(|p| ExportRow {
                data: &p.data.0,
                category_id: p.category_id,
            })
            .collect();

        let body = generate(profile.format, &keys, &rows, &profile.filters.0)?;
        debug!(
            profile_id = %profile.id,
            fields = keys.len(),
            candidates = rows.len(),
            bytes = body.len(),
            "Rendered export"
        );
        Ok(GeneratedExport {
            body,
            format: profile.format,
            file_name: profile.file_name(),
        })
    }
}

/// Trim keys and drop blanks and duplicates, keeping order.
fn clean_keys(keys: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.trim();
        if !key.is_empty() && !cleaned.iter().any(|k| k == key) {
            cleaned.push(key.to_string());
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keys() {
        let keys = vec![" sku".to_string(), "".into(), "price".into(), "sku".into()];
        assert_eq!(clean_keys(keys), vec!["sku".to_string(), "price".to_string()]);
    }
}
