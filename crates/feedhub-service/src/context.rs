//! Request context carrying the authenticated user and the active workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_entity::workspace::WorkspaceRole;

/// Context for the current authenticated, workspace-scoped request.
///
/// Built by the API layer after verifying the bearer token and the
/// caller's membership in the selected workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email, when the token carries one.
    pub email: Option<String>,
    /// The active workspace.
    pub workspace_id: Uuid,
    /// The caller's role in the active workspace.
    pub role: WorkspaceRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        email: Option<String>,
        workspace_id: Uuid,
        role: WorkspaceRole,
    ) -> Self {
        Self {
            user_id,
            email,
            workspace_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Fail unless the caller may mutate workspace data.
    pub fn require_editor(&self) -> AppResult<()> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(AppError::authorization("Editor or owner role required"))
        }
    }

    /// Fail unless the caller owns the workspace.
    pub fn require_owner(&self) -> AppResult<()> {
        if self.role == WorkspaceRole::Owner {
            Ok(())
        } else {
            Err(AppError::authorization("Owner role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedhub_core::error::ErrorKind;

    fn ctx(role: WorkspaceRole) -> RequestContext {
        RequestContext::new(Uuid::new_v4(), None, Uuid::new_v4(), role)
    }

    #[test]
    fn test_role_requirements() {
        assert!(ctx(WorkspaceRole::Owner).require_owner().is_ok());
        assert!(ctx(WorkspaceRole::Editor).require_editor().is_ok());
        assert_eq!(
            ctx(WorkspaceRole::Viewer).require_editor().unwrap_err().kind,
            ErrorKind::Authorization
        );
        assert!(ctx(WorkspaceRole::Editor).require_owner().is_err());
    }
}
