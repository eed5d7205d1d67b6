//! Export profile entity model.

use chrono::{DateTime, Utc};
use feedhub_feed::FeedFormat;
use feedhub_feed::export::ExportFilters;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::fmt;
use uuid::Uuid;

/// How an export profile's document is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Authenticated on-demand download.
    #[default]
    Download,
    /// Public live feed URL.
    Feed,
}

impl DeliveryMethod {
    /// Return the method as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Feed => "feed",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Saved configuration of an outbound document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExportProfile {
    /// Unique profile identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Display name.
    pub name: String,
    /// Output format.
    pub format: FeedFormat,
    /// Custom field keys to include.
    pub field_selection: Vec<String>,
    /// Preferred key order.
    pub field_ordering: Vec<String>,
    /// Row filters.
    pub filters: Json<ExportFilters>,
    /// Delivery method.
    pub delivery_method: DeliveryMethod,
    /// Inactive profiles serve no live feed.
    pub is_active: bool,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ExportProfile {
    /// Whether the public live feed may serve this profile.
    pub fn serves_live_feed(&self) -> bool {
        self.is_active && self.delivery_method == DeliveryMethod::Feed
    }

    /// File name used in `Content-Disposition`.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = if stem.trim_matches('_').is_empty() {
            "export".to_string()
        } else {
            stem
        };
        format!("{stem}.{}", self.format.extension())
    }
}

/// Data required to create an export profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExportProfile {
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Display name.
    pub name: String,
    /// Output format.
    pub format: FeedFormat,
    /// Field selection.
    pub field_selection: Vec<String>,
    /// Field ordering.
    pub field_ordering: Vec<String>,
    /// Row filters.
    pub filters: ExportFilters,
    /// Delivery method.
    pub delivery_method: DeliveryMethod,
    /// Active flag.
    pub is_active: bool,
}

/// Partial update of an export profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExportProfile {
    /// New name.
    pub name: Option<String>,
    /// New format.
    pub format: Option<FeedFormat>,
    /// New selection.
    pub field_selection: Option<Vec<String>>,
    /// New ordering.
    pub field_ordering: Option<Vec<String>>,
    /// New filters.
    pub filters: Option<ExportFilters>,
    /// New delivery method.
    pub delivery_method: Option<DeliveryMethod>,
    /// New active flag.
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, delivery_method: DeliveryMethod, is_active: bool) -> ExportProfile {
        ExportProfile {
            id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            name: name.to_string(),
            format: FeedFormat::Xml,
            field_selection: vec![],
            field_ordering: vec![],
            filters: Json(ExportFilters::default()),
            delivery_method,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_serves_live_feed() {
        assert!(profile("a", DeliveryMethod::Feed, true).serves_live_feed());
        assert!(!profile("a", DeliveryMethod::Feed, false).serves_live_feed());
        assert!(!profile("a", DeliveryMethod::Download, true).serves_live_feed());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            profile("Google Shopping (DE)", DeliveryMethod::Feed, true).file_name(),
            "Google_Shopping__DE_.xml"
        );
        assert_eq!(profile("???", DeliveryMethod::Feed, true).file_name(), "export.xml");
    }
}
