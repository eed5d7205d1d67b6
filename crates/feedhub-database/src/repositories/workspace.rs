//! Workspace and membership repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::workspace::{
    CreateWorkspace, MemberWorkspace, Workspace, WorkspaceMember, WorkspaceRole,
};

use super::violates;

/// Repository for workspaces and their members.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    /// Create a new workspace repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a workspace and make its creator the owner, atomically.
    pub async fn create(&self, data: &CreateWorkspace) -> AppResult<Workspace> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let workspace = sqlx::query_as::<_, Workspace>(
            "INSERT INTO workspaces (name, slug, created_by) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if violates(&e, "workspaces_slug_key") {
                AppError::conflict(format!("Workspace slug '{}' already exists", data.slug))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create workspace", e)
            }
        })?;

        sqlx::query("INSERT INTO workspace_members (workspace_id, user_id, role) VALUES ($1, $2, 'owner')")
            .bind(workspace.id)
            .bind(data.created_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add workspace owner", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit workspace", e)
        })?;
        Ok(workspace)
    }

    /// Check whether a slug is taken.
    pub async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM workspaces WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check slug", e))
    }

    /// Find a workspace by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find workspace", e))
    }

    /// List the workspaces a user belongs to, with the user's role.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<MemberWorkspace>> {
        sqlx::query_as::<_, MemberWorkspace>(
            "SELECT w.*, m.role FROM workspaces w \
             JOIN workspace_members m ON m.workspace_id = w.id \
             WHERE m.user_id = $1 ORDER BY w.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list workspaces", e))
    }

    /// Find a user's membership in a workspace.
    pub async fn find_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<WorkspaceMember>> {
        sqlx::query_as::<_, WorkspaceMember>(
            "SELECT * FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    /// List all members of a workspace.
    pub async fn list_members(&self, workspace_id: Uuid) -> AppResult<Vec<WorkspaceMember>> {
        sqlx::query_as::<_, WorkspaceMember>(
            "SELECT * FROM workspace_members WHERE workspace_id = $1 ORDER BY created_at ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }

    /// Add a member, or change the role of an existing one.
    pub async fn upsert_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        email: Option<&str>,
        role: WorkspaceRole,
    ) -> AppResult<WorkspaceMember> {
        sqlx::query_as::<_, WorkspaceMember>(
            "INSERT INTO workspace_members (workspace_id, user_id, email, role) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (workspace_id, user_id) DO UPDATE \
             SET role = EXCLUDED.role, email = COALESCE(EXCLUDED.email, workspace_members.email) \
             RETURNING *",
        )
        .bind(workspace_id)
        .bind(user_id)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add member", e))
    }

    /// Count the owners of a workspace.
    pub async fn count_owners(&self, workspace_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workspace_members WHERE workspace_id = $1 AND role = 'owner'",
        )
        .bind(workspace_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count owners", e))
    }
}
