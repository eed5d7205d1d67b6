//! Workspace creation, membership and tenant context resolution.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_database::repositories::WorkspaceRepository;
use feedhub_entity::workspace::{
    CreateWorkspace, MemberWorkspace, Workspace, WorkspaceMember, WorkspaceRole, slugify,
};

use crate::context::RequestContext;

/// Number of numbered slug variants tried before giving up.
const SLUG_ATTEMPTS: u32 = 50;

/// Manages workspaces and their members.
#[derive(Debug, Clone)]
pub struct WorkspaceService {
    /// Workspace repository.
    workspace_repo: Arc<WorkspaceRepository>,
}

impl WorkspaceService {
    /// Creates a new workspace service.
    pub fn new(workspace_repo: Arc<WorkspaceRepository>) -> Self {
        Self { workspace_repo }
    }

    /// Create a workspace; the creator becomes its owner.
    pub async fn create(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        name: &str,
    ) -> AppResult<Workspace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Workspace name cannot be empty"));
        }

        let base = slugify(name);
        let mut slug = base.clone();
        let mut attempt = 1;
        while self.workspace_repo.slug_exists(&slug).await? {
            attempt += 1;
            if attempt > SLUG_ATTEMPTS {
                return Err(AppError::conflict("Could not allocate a unique workspace slug"));
            }
            slug = format!("{base}-{attempt}");
        }

        let workspace = self
            .workspace_repo
            .create(&CreateWorkspace {
                name: name.to_string(),
                slug,
                created_by: user_id,
            })
            .await?;

        if let Some(email) = email {
            self.workspace_repo
                .upsert_member(workspace.id, user_id, Some(email), WorkspaceRole::Owner)
                .await?;
        }

        info!(workspace_id = %workspace.id, user_id = %user_id, slug = %workspace.slug, "Workspace created");
        Ok(workspace)
    }

    /// Workspaces the user belongs to, with the user's role.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<MemberWorkspace>> {
        self.workspace_repo.list_for_user(user_id).await
    }

    /// Resolve the caller's context in a workspace.
    ///
    /// Fails with 404 for unknown workspaces and 403 for non-members.
    pub async fn resolve_context(
        &self,
        user_id: Uuid,
        email: Option<String>,
        workspace_id: Uuid,
    ) -> AppResult<RequestContext> {
        let member = self
            .workspace_repo
            .find_member(workspace_id, user_id)
            .await?;
        match member {
            Some(member) => Ok(RequestContext::new(user_id, email, workspace_id, member.role)),
            None => {
                if self.workspace_repo.find_by_id(workspace_id).await?.is_none() {
                    Err(AppError::not_found("Workspace not found"))
                } else {
                    Err(AppError::authorization("Not a member of this workspace"))
                }
            }
        }
    }

    /// Members of the active workspace.
    pub async fn list_members(&self, ctx: &RequestContext) -> AppResult<Vec<WorkspaceMember>> {
        self.workspace_repo.list_members(ctx.workspace_id).await
    }

    /// Add a member or change an existing member's role. Owner only.
    ///
    /// The last owner cannot demote themselves.
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        email: Option<&str>,
        role: WorkspaceRole,
    ) -> AppResult<WorkspaceMember> {
        ctx.require_owner()?;

        if user_id == ctx.user_id
            && role != WorkspaceRole::Owner
            && self.workspace_repo.count_owners(ctx.workspace_id).await? <= 1
        {
            return Err(AppError::validation("A workspace needs at least one owner"));
        }

        let member = self
            .workspace_repo
            .upsert_member(ctx.workspace_id, user_id, email, role)
            .await?;
        info!(
            workspace_id = %ctx.workspace_id,
            member_id = %user_id,
            role = %role,
            by = %ctx.user_id,
            "Workspace member saved"
        );
        Ok(member)
    }
}
