//! Supplier status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a supplier's feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "supplier_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    /// Last sync succeeded (or never ran).
    #[default]
    Active,
    /// Excluded from scheduled syncs.
    Paused,
    /// Last sync failed.
    Error,
}

impl SupplierStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
