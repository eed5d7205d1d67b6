//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use feedhub_entity::FeedFormat;
use feedhub_entity::field::{NewFieldMapping, UpdateCustomField};
use feedhub_entity::supplier::{
    FeedCredentials, SourceType, SupplierStatus, SyncSchedule, UpdateSupplier,
};
use feedhub_entity::workspace::WorkspaceRole;
use feedhub_entity::{FieldDatatype, export::DeliveryMethod};
use feedhub_feed::export::ExportFilters;
use feedhub_service::export::CreateExportRequest;
use feedhub_service::field::CreateFieldRequest;
use feedhub_service::supplier::CreateSupplierRequest;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create workspace request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    /// Display name.
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
}

/// Add or update a workspace member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// The user's ID at the auth provider.
    pub user_id: Uuid,
    /// The user's email, for display.
    #[validate(email)]
    pub email: Option<String>,
    /// Role to grant.
    pub role: WorkspaceRole,
}

/// Sniff keys of a feed that is not saved yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SniffRequest {
    /// Feed URL.
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
    /// Format override.
    pub feed_type: Option<FeedFormat>,
    /// Endpoint credentials.
    #[serde(default)]
    pub credentials: FeedCredentials,
}

/// Create supplier request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSupplierBody {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// URL or upload.
    pub source_type: SourceType,
    /// Feed URL.
    pub endpoint_url: Option<String>,
    /// Format override.
    pub feed_type: Option<FeedFormat>,
    /// Endpoint credentials.
    pub credentials: Option<FeedCredentials>,
    /// Source key of the unique item identifier.
    #[validate(length(min = 1, max = 200, message = "Unique key is required"))]
    pub unique_key: String,
    /// Sync schedule.
    pub schedule: Option<SyncSchedule>,
}

impl From<CreateSupplierBody> for CreateSupplierRequest {
    fn from(body: CreateSupplierBody) -> Self {
        Self {
            name: body.name,
            source_type: body.source_type,
            endpoint_url: body.endpoint_url,
            feed_type: body.feed_type,
            credentials: body.credentials,
            unique_key: body.unique_key,
            schedule: body.schedule,
        }
    }
}

/// Partial supplier update. `feed_type: null` clears the override.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSupplierBody {
    /// New name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New feed URL.
    pub endpoint_url: Option<String>,
    /// New format override.
    #[serde(default, deserialize_with = "double_option")]
    pub feed_type: Option<Option<FeedFormat>>,
    /// New credentials.
    pub credentials: Option<FeedCredentials>,
    /// New unique key.
    #[validate(length(min = 1, max = 200))]
    pub unique_key: Option<String>,
    /// New schedule.
    pub schedule: Option<SyncSchedule>,
    /// `active` or `paused`.
    pub status: Option<SupplierStatus>,
}

impl From<UpdateSupplierBody> for UpdateSupplier {
    fn from(body: UpdateSupplierBody) -> Self {
        Self {
            name: body.name,
            endpoint_url: body.endpoint_url,
            feed_type: body.feed_type,
            credentials: body.credentials,
            unique_key: body.unique_key,
            schedule: body.schedule,
            status: body.status,
        }
    }
}

/// Replace all mappings of a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceMappingsRequest {
    /// The complete new mapping set.
    #[serde(default)]
    pub mappings: Vec<NewFieldMapping>,
}

/// Create custom field request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFieldBody {
    /// Machine key, `[a-z0-9_]+`.
    #[validate(length(min = 1, max = 100))]
    pub key: String,
    /// Display name.
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// Datatype.
    pub datatype: Option<FieldDatatype>,
    /// Explicit position.
    pub sort_order: Option<i32>,
    /// Visible in default exports.
    pub is_visible: Option<bool>,
    /// Values assign the product category.
    pub is_category_field: Option<bool>,
}

impl From<CreateFieldBody> for CreateFieldRequest {
    fn from(body: CreateFieldBody) -> Self {
        Self {
            key: body.key,
            name: body.name,
            datatype: body.datatype,
            sort_order: body.sort_order,
            is_visible: body.is_visible,
            is_category_field: body.is_category_field,
        }
    }
}

/// Partial custom field update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFieldBody {
    /// New key.
    #[validate(length(min = 1, max = 100))]
    pub key: Option<String>,
    /// New name.
    #[validate(length(min = 1, max = 200))]
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

impl From<UpdateFieldBody> for UpdateCustomField {
    fn from(body: UpdateFieldBody) -> Self {
        Self {
            key: body.key,
            name: body.name,
            datatype: body.datatype,
            sort_order: body.sort_order,
            is_visible: body.is_visible,
            is_category_field: body.is_category_field,
        }
    }
}

/// New field order, first to last.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReorderFieldsRequest {
    /// Field IDs in their new order.
    #[validate(length(min = 1, message = "At least one field is required"))]
    pub ids: Vec<Uuid>,
}

/// Set or clear a product's category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignCategoryRequest {
    /// Category, `null` to clear.
    pub category_id: Option<Uuid>,
}

/// Create category request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Parent category.
    pub parent_id: Option<Uuid>,
}

/// Rename and/or move a category. `parent_id: null` moves it to the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// New name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New parent.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

/// Create export profile request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExportBody {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Output format.
    pub format: FeedFormat,
    /// Field keys to include; empty selects all visible fields.
    #[serde(default)]
    pub field_selection: Vec<String>,
    /// Preferred key order.
    #[serde(default)]
    pub field_ordering: Vec<String>,
    /// Row filters.
    #[serde(default)]
    pub filters: ExportFilters,
    /// Download or live feed.
    pub delivery_method: Option<DeliveryMethod>,
    /// Active flag.
    pub is_active: Option<bool>,
}

impl From<CreateExportBody> for CreateExportRequest {
    fn from(body: CreateExportBody) -> Self {
        Self {
            name: body.name,
            format: body.format,
            field_selection: body.field_selection,
            field_ordering: body.field_ordering,
            filters: body.filters,
            delivery_method: body.delivery_method,
            is_active: body.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_supplier_distinguishes_null_from_absent() {
        let absent: UpdateSupplierBody = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(absent.feed_type, None);

        let cleared: UpdateSupplierBody = serde_json::from_str(r#"{"feed_type":null}"#).unwrap();
        assert_eq!(cleared.feed_type, Some(None));

        let pinned: UpdateSupplierBody = serde_json::from_str(r#"{"feed_type":"xml"}"#).unwrap();
        assert_eq!(pinned.feed_type, Some(Some(FeedFormat::Xml)));
    }

    #[test]
    fn test_category_move_to_root() {
        let req: UpdateCategoryRequest = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(req.parent_id, Some(None));
        assert!(req.name.is_none());
    }

    #[test]
    fn test_create_supplier_validation() {
        let body: CreateSupplierBody = serde_json::from_value(serde_json::json!({
            "name": "",
            "source_type": "url",
            "endpoint_url": "https://example.com/feed.csv",
            "unique_key": "sku"
        }))
        .unwrap();
        assert!(body.validate().is_err());
    }
}
