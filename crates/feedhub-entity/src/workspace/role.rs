//! Workspace membership roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user within a workspace.
///
/// Ordered by privilege: Owner > Editor > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workspace_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceRole {
    /// Full control including membership management.
    Owner,
    /// Can create and change suppliers, fields, categories and exports.
    Editor,
    /// Read-only access.
    Viewer,
}

impl WorkspaceRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Editor => 2,
            Self::Viewer => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &WorkspaceRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Whether the role may mutate workspace data.
    pub fn can_edit(&self) -> bool {
        self.has_at_least(&Self::Editor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkspaceRole {
    type Err = feedhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(feedhub_core::AppError::validation(format!(
                "Invalid workspace role: '{s}'. Expected one of: owner, editor, viewer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(WorkspaceRole::Owner.has_at_least(&WorkspaceRole::Editor));
        assert!(WorkspaceRole::Editor.can_edit());
        assert!(!WorkspaceRole::Viewer.can_edit());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("OWNER".parse::<WorkspaceRole>().unwrap(), WorkspaceRole::Owner);
        assert!("admin".parse::<WorkspaceRole>().is_err());
    }
}
