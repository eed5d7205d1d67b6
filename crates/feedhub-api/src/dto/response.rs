//! Response DTOs.

use serde::{Deserialize, Serialize};

use feedhub_entity::export::ExportProfile;
use feedhub_entity::supplier::Supplier;

/// A supplier as shown to clients: credentials are reduced to their type.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierResponse {
    /// The supplier columns.
    #[serde(flatten)]
    pub supplier: Supplier,
    /// `none`, `basic`, `bearer` or `header`.
    pub credentials_type: &'static str,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            credentials_type: supplier.credentials_kind(),
            supplier,
        }
    }
}

/// An export profile with its public feed URL.
#[derive(Debug, Clone, Serialize)]
pub struct ExportProfileResponse {
    /// The profile columns.
    #[serde(flatten)]
    pub profile: ExportProfile,
    /// Live feed URL for `feed` profiles.
    pub feed_url: Option<String>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// `ready` or `unavailable`.
    pub status: String,
    /// `connected` or `unreachable`.
    pub database: String,
}
