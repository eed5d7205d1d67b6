//! Workspace custom fields.

use chrono::{DateTime, Utc};
use feedhub_feed::FieldDatatype;
use feedhub_feed::mapping::TargetField;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A field of the workspace's product schema.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomField {
    /// Unique field identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Machine key, `[a-z0-9_]+`, unique per workspace.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Value datatype.
    pub datatype: FieldDatatype,
    /// Position in default exports and listings.
    pub sort_order: i32,
    /// Included in default exports.
    pub is_visible: bool,
    /// Values assign the product category.
    pub is_category_field: bool,
    /// When the field was created.
    pub created_at: DateTime<Utc>,
    /// When the field was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CustomField {
    /// View of this field used by the mapper.
    pub fn target(&self) -> TargetField {
        TargetField {
            key: self.key.clone(),
            datatype: self.datatype,
            is_category_field: self.is_category_field,
        }
    }
}

/// Data required to create a custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomField {
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Machine key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Datatype.
    pub datatype: FieldDatatype,
    /// Explicit position; appended last when `None`.
    pub sort_order: Option<i32>,
    /// Visibility.
    pub is_visible: bool,
    /// Category flag.
    pub is_category_field: bool,
}

/// Partial update of a custom field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomField {
    /// New key (mappings follow the rename).
    pub key: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New datatype.
    pub datatype: Option<FieldDatatype>,
    /// New position.
    pub sort_order: Option<i32>,
    /// New visibility.
    pub is_visible: Option<bool>,
    /// New category flag.
    pub is_category_field: Option<bool>,
}

/// Check a custom field key against `[a-z0-9_]+`.
pub fn is_valid_field_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key_rule() {
        assert!(is_valid_field_key("price_eur"));
        assert!(is_valid_field_key("ean13"));
        assert!(!is_valid_field_key(""));
        assert!(!is_valid_field_key("Price"));
        assert!(!is_valid_field_key("unit-price"));
    }
}
