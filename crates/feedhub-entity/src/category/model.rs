//! Category entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Separator between ancestor names in a category path.
pub const PATH_SEPARATOR: &str = " > ";

/// A node of a workspace's category tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Parent category; `None` for roots.
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Ancestor names and own name joined with `" > "`.
    pub path: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Path of a category named `name` under a parent with `parent_path`.
pub fn build_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_path() {
        assert_eq!(build_path(None, "Electronics"), "Electronics");
        assert_eq!(
            build_path(Some("Electronics"), "Phones"),
            "Electronics > Phones"
        );
    }
}
