//! Category CRUD with transactional path maintenance.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_database::repositories::CategoryRepository;
use feedhub_entity::category::{Category, CategoryNode, PATH_SEPARATOR, build_tree};

use crate::context::RequestContext;

/// Manages the workspace category tree.
#[derive(Debug, Clone)]
pub struct CategoryService {
    /// Category repository.
    category_repo: Arc<CategoryRepository>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(category_repo: Arc<CategoryRepository>) -> Self {
        Self { category_repo }
    }

    /// All categories, ordered by path.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Category>> {
        self.category_repo.list(ctx.workspace_id).await
    }

    /// The category tree.
    pub async fn tree(&self, ctx: &RequestContext) -> AppResult<Vec<CategoryNode>> {
        let categories = self.category_repo.list(ctx.workspace_id).await?;
        Ok(build_tree(&categories))
    }

    /// Get a category.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Category> {
        self.category_repo
            .find(ctx.workspace_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    /// Create a category.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Category> {
        ctx.require_editor()?;
        let name = check_name(name)?;
        let category = self
            .category_repo
            .create(ctx.workspace_id, parent_id, name)
            .await?;
        info!(workspace_id = %ctx.workspace_id, category_id = %category.id, path = %category.path, "Category created");
        Ok(category)
    }

    /// Rename and/or move a category. `parent_id` of `Some(None)` moves it
    /// to the root.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        name: Option<&str>,
        parent_id: Option<Option<Uuid>>,
    ) -> AppResult<Category> {
        ctx.require_editor()?;
        let name = name.map(check_name).transpose()?;
        if parent_id == Some(Some(id)) {
            return Err(AppError::validation("A category cannot be its own parent"));
        }
        let category = self
            .category_repo
            .update(ctx.workspace_id, id, name, parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
        info!(workspace_id = %ctx.workspace_id, category_id = %id, path = %category.path, "Category updated");
        Ok(category)
    }

    /// Delete a category without children.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_editor()?;
        self.get(ctx, id).await?;
        if self.category_repo.has_children(ctx.workspace_id, id).await? {
            return Err(AppError::validation(
                "Category has subcategories; delete or move them first",
            ));
        }
        if !self.category_repo.delete(ctx.workspace_id, id).await? {
            return Err(AppError::not_found("Category not found"));
        }
        info!(workspace_id = %ctx.workspace_id, category_id = %id, "Category deleted");
        Ok(())
    }
}

/// Trim a category name; names may not be blank or contain the path separator.
fn check_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name cannot be empty"));
    }
    if name.contains(PATH_SEPARATOR.trim()) {
        return Err(AppError::validation("Category name cannot contain '>'"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert_eq!(check_name("  Phones ").unwrap(), "Phones");
        assert!(check_name("   ").is_err());
        assert!(check_name("A > B").is_err());
        assert!(check_name("A>B").is_err());
    }
}
