//! Workspace membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::WorkspaceRole;

/// Membership of a user in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkspaceMember {
    /// Workspace.
    pub workspace_id: Uuid,
    /// Member user id (subject of the auth provider's tokens).
    pub user_id: Uuid,
    /// Contact email, if known.
    pub email: Option<String>,
    /// Role within the workspace.
    pub role: WorkspaceRole,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}
