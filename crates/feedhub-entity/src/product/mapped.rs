//! Mapped product rows aligned to the workspace schema.

use chrono::{DateTime, Utc};
use feedhub_feed::FieldMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A coerced, schema-aligned product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MappedProduct {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Source supplier.
    pub supplier_id: Uuid,
    /// Supplier external id.
    pub external_id: String,
    /// Raw row this product was mapped from.
    pub raw_product_id: Option<Uuid>,
    /// Assigned category.
    pub category_id: Option<Uuid>,
    /// Values keyed by custom field key.
    pub data: Json<FieldMap>,
    /// When the row was first mapped.
    pub created_at: DateTime<Utc>,
    /// When the row was last mapped.
    pub updated_at: DateTime<Utc>,
}

/// A mapped row ready to be upserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMappedProduct {
    /// Supplier external id.
    pub external_id: String,
    /// Raw row back-reference.
    pub raw_product_id: Uuid,
    /// Category resolved from a category field.
    pub category_id: Option<Uuid>,
    /// Coerced values.
    pub data: FieldMap,
}
