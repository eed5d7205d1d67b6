//! Workspace entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::WorkspaceRole;

/// A tenant. All domain data is scoped by workspace id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Unique workspace identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// URL-friendly unique slug.
    pub slug: String,
    /// User who created the workspace.
    pub created_by: Uuid,
    /// When the workspace was created.
    pub created_at: DateTime<Utc>,
    /// When the workspace was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A workspace together with the caller's role in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberWorkspace {
    /// The workspace.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub workspace: Workspace,
    /// The caller's role.
    pub role: WorkspaceRole,
}

/// Data required to create a new workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    /// Display name.
    pub name: String,
    /// Unique slug.
    pub slug: String,
    /// Creating user (becomes owner).
    pub created_by: Uuid,
}

/// Derive a slug from a display name: lowercase ASCII alphanumerics
/// separated by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "workspace".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Acme Shop GmbH! "), "acme-shop-gmbh");
        assert_eq!(slugify("a--b"), "a-b");
        assert_eq!(slugify("Ünïcode"), "n-code");
        assert_eq!(slugify("***"), "workspace");
    }
}
