/*
 * Responsibility
 * - categories table access
 * - deleting a category that products still reference is a Conflict
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update. `description`: `Some(None)` clears the column.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<CategoryRow>, RepoError>;
    async fn get(&self, category_id: Uuid) -> Result<Option<CategoryRow>, RepoError>;
    async fn create(&self, new: NewCategory) -> Result<CategoryRow, RepoError>;
    async fn update(
        &self,
        category_id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<CategoryRow>, RepoError>;
    async fn delete(&self, category_id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgCategoryRepo {
    db: PgPool,
}

impl PgCategoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list(&self) -> Result<Vec<CategoryRow>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT category_id, name, description, created_at
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, category_id: Uuid) -> Result<Option<CategoryRow>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT category_id, name, description, created_at
            FROM categories
            WHERE category_id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewCategory) -> Result<CategoryRow, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (category_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING category_id, name, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.description.as_deref())
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        category_id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<CategoryRow>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET
                name = COALESCE($2, name),
                description = CASE
                    WHEN $3 = false THEN description
                    ELSE $4
                END
            WHERE category_id = $1
            RETURNING category_id, name, description, created_at
            "#,
        )
        .bind(category_id)
        .bind(patch.name.as_deref())
        .bind(patch.description.is_some()) // $3: flag to set description
        .bind(patch.description.flatten()) // $4: new description value
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, category_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE category_id = $1
            "#,
        )
        .bind(category_id)
        .execute(&self.db)
        .await
        .map_err(RepoError::from_sqlx_on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
