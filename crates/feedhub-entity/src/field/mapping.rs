//! Supplier field mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How a source value is transformed before coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transform_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    /// Value copied as-is.
    #[default]
    Direct,
}

/// Maps one supplier source key to one custom field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FieldMapping {
    /// Unique mapping identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Supplier the source key belongs to.
    pub supplier_id: Uuid,
    /// Key in the supplier's raw rows.
    pub source_key: String,
    /// Target custom field key.
    pub field_key: String,
    /// Transform applied to the value.
    pub transform_type: TransformType,
    /// When the mapping was created.
    pub created_at: DateTime<Utc>,
    /// When the mapping was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A mapping in a replace-all request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFieldMapping {
    /// Supplier source key.
    pub source_key: String,
    /// Target custom field key.
    pub field_key: String,
}
