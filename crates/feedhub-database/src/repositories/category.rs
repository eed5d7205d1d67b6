//! Category repository implementation.
//!
//! Paths are denormalized (`"Electronics > Phones"`). Every write that can
//! change a path recomputes the affected subtree inside one transaction.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::category::{Category, build_path};

use super::violates;

const PATH_UNIQUE: &str = "categories_workspace_path_key";
const PARENT_FK: &str = "categories_parent_fkey";

fn map_write_error(err: sqlx::Error, action: &'static str) -> AppError {
    if violates(&err, PATH_UNIQUE) {
        AppError::conflict("A category with this path already exists")
    } else if violates(&err, PARENT_FK) {
        AppError::validation("Category has subcategories or an unknown parent")
    } else {
        AppError::with_source(ErrorKind::Database, action, err)
    }
}

/// Repository for the workspace category tree.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }

    async fn parent_path(
        tx: &mut Transaction<'static, Postgres>,
        workspace_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<String> {
        let path: Option<String> = sqlx::query_scalar(
            "SELECT path FROM categories WHERE workspace_id = $1 AND id = $2 FOR SHARE",
        )
        .bind(workspace_id)
        .bind(parent_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load parent", e))?;
        path.ok_or_else(|| AppError::validation("Parent category not found"))
    }

    /// Create a category under an optional parent.
    pub async fn create(
        &self,
        workspace_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Category> {
        let mut tx = self.begin().await?;
        let parent_path = match parent_id {
            Some(parent) => Some(Self::parent_path(&mut tx, workspace_id, parent).await?),
            None => None,
        };
        let path = build_path(parent_path.as_deref(), name);

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (workspace_id, parent_id, name, path) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(workspace_id)
        .bind(parent_id)
        .bind(name)
        .bind(&path)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create category"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit category", e))?;
        Ok(category)
    }

    /// List all categories of a workspace by path.
    pub async fn list(&self, workspace_id: Uuid) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE workspace_id = $1 ORDER BY path ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list categories", e))
    }

    /// Find a category within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find category", e))
    }

    /// Whether a category has direct children.
    pub async fn has_children(&self, workspace_id: Uuid, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE workspace_id = $1 AND parent_id = $2)",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check children", e))
    }

    /// Rename and/or reparent a category, recomputing its subtree's paths.
    ///
    /// `parent_id` of `Some(None)` moves the category to the root.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        parent_id: Option<Option<Uuid>>,
    ) -> AppResult<Option<Category>> {
        let mut tx = self.begin().await?;

        let current = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE workspace_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load category", e))?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_parent = parent_id.unwrap_or(current.parent_id);
        let new_name = name.unwrap_or(&current.name);

        let parent_path = match new_parent {
            Some(parent) => {
                let in_subtree: bool = sqlx::query_scalar(
                    "WITH RECURSIVE subtree AS ( \
                        SELECT id FROM categories WHERE workspace_id = $1 AND id = $2 \
                        UNION ALL \
                        SELECT c.id FROM categories c JOIN subtree s ON c.parent_id = s.id \
                        WHERE c.workspace_id = $1 \
                     ) SELECT EXISTS (SELECT 1 FROM subtree WHERE id = $3)",
                )
                .bind(workspace_id)
                .bind(id)
                .bind(parent)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check subtree", e))?;
                if in_subtree {
                    return Err(AppError::validation(
                        "A category cannot be moved under itself or its descendants",
                    ));
                }
                Some(Self::parent_path(&mut tx, workspace_id, parent).await?)
            }
            None => None,
        };
        let new_path = build_path(parent_path.as_deref(), new_name);

        let updated = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $3, parent_id = $4, path = $5, updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(new_name)
        .bind(new_parent)
        .bind(&new_path)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update category"))?;

        if new_path != current.path {
            // Descendant paths all start with the old path; swap that prefix.
            let old_len = current.path.chars().count() as i32;
            sqlx::query(
                "WITH RECURSIVE subtree AS ( \
                    SELECT id FROM categories WHERE workspace_id = $1 AND parent_id = $2 \
                    UNION ALL \
                    SELECT c.id FROM categories c JOIN subtree s ON c.parent_id = s.id \
                    WHERE c.workspace_id = $1 \
                 ) \
                 UPDATE categories SET path = $3 || substr(path, $4 + 1), updated_at = NOW() \
                 WHERE workspace_id = $1 AND id IN (SELECT id FROM subtree)",
            )
            .bind(workspace_id)
            .bind(id)
            .bind(&new_path)
            .bind(old_len)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to update category paths"))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit category", e))?;
        Ok(Some(updated))
    }

    /// Delete a leaf category. Products in it become uncategorized.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if violates(&e, PARENT_FK) {
                    AppError::validation("Category has subcategories")
                } else {
                    AppError::with_source(ErrorKind::Database, "Failed to delete category", e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }
}
