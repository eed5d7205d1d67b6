//! Custom field CRUD and ordering.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_database::repositories::CustomFieldRepository;
use feedhub_entity::FieldDatatype;
use feedhub_entity::field::{CreateCustomField, CustomField, UpdateCustomField, is_valid_field_key};

use crate::context::RequestContext;

/// Request to create a custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFieldRequest {
    /// Machine key, `[a-z0-9_]+`.
    pub key: String,
    /// Display name; defaults to the key.
    pub name: Option<String>,
    /// Datatype, string by default.
    pub datatype: Option<FieldDatatype>,
    /// Explicit position.
    pub sort_order: Option<i32>,
    /// Visible in default exports, true by default.
    pub is_visible: Option<bool>,
    /// Values assign the product category.
    pub is_category_field: Option<bool>,
}

/// Manages the workspace product schema.
#[derive(Debug, Clone)]
pub struct FieldService {
    /// Custom field repository.
    field_repo: Arc<CustomFieldRepository>,
}

impl FieldService {
    /// Creates a new field service.
    pub fn new(field_repo: Arc<CustomFieldRepository>) -> Self {
        Self { field_repo }
    }

    /// Fields of the active workspace in display order.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<CustomField>> {
        self.field_repo.list(ctx.workspace_id).await
    }

    /// Create a field.
    pub async fn create(&self, ctx: &RequestContext, req: CreateFieldRequest) -> AppResult<CustomField> {
        ctx.require_editor()?;
        let key = req.key.trim().to_string();
        check_key(&key)?;
        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| key.clone());

        let field = self
            .field_repo
            .create(&CreateCustomField {
                workspace_id: ctx.workspace_id,
                key,
                name,
                datatype: req.datatype.unwrap_or_default(),
                sort_order: req.sort_order,
                is_visible: req.is_visible.unwrap_or(true),
                is_category_field: req.is_category_field.unwrap_or(false),
            })
            .await?;
        info!(workspace_id = %ctx.workspace_id, field = %field.key, "Custom field created");
        Ok(field)
    }

    /// Apply a partial update. Renaming the key carries mappings along.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut req: UpdateCustomField,
    ) -> AppResult<CustomField> {
        ctx.require_editor()?;
        if let Some(key) = req.key.as_mut() {
            *key = key.trim().to_string();
            check_key(key)?;
        }
        if let Some(name) = req.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Field name cannot be empty"));
            }
        }
        self.field_repo
            .update(ctx.workspace_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Field not found"))
    }

    /// Delete a field and its mappings.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_editor()?;
        if !self.field_repo.delete(ctx.workspace_id, id).await? {
            return Err(AppError::not_found("Field not found"));
        }
        info!(workspace_id = %ctx.workspace_id, field_id = %id, "Custom field deleted");
        Ok(())
    }

    /// Reorder fields by the given id sequence and return the new order.
    pub async fn reorder(&self, ctx: &RequestContext, ids: &[Uuid]) -> AppResult<Vec<CustomField>> {
        ctx.require_editor()?;
        let mut seen = HashSet::with_capacity(ids.len());
        if !ids.iter().all(|id| seen.insert(*id)) {
            return Err(AppError::validation("Field order contains duplicates"));
        }
        self.field_repo.reorder(ctx.workspace_id, ids).await?;
        self.field_repo.list(ctx.workspace_id).await
    }
}

fn check_key(key: &str) -> AppResult<()> {
    if is_valid_field_key(key) {
        Ok(())
    } else {
        Err(AppError::validation("Field key must match [a-z0-9_]+"))
    }
}
