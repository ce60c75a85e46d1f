/*
 * Responsibility
 * - reviews CRUD
 * - user_id is the author (taken from the caller's token, never from the body)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::{Page, error::RepoError};

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub review_id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub comment: Option<Option<String>>,
}

#[async_trait]
pub trait ReviewRepo: Send + Sync {
    async fn list(&self, product_id: Option<Uuid>, page: Page) -> Result<Vec<ReviewRow>, RepoError>;
    async fn get(&self, review_id: Uuid) -> Result<Option<ReviewRow>, RepoError>;
    async fn create(&self, new: NewReview) -> Result<ReviewRow, RepoError>;
    async fn update(
        &self,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<ReviewRow>, RepoError>;
    async fn delete(&self, review_id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgReviewRepo {
    db: PgPool,
}

impl PgReviewRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepo for PgReviewRepo {
    async fn list(&self, product_id: Option<Uuid>, page: Page) -> Result<Vec<ReviewRow>, RepoError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT review_id, product_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE ($1::uuid IS NULL OR product_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(product_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, review_id: Uuid) -> Result<Option<ReviewRow>, RepoError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT review_id, product_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewReview) -> Result<ReviewRow, RepoError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (review_id, product_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING review_id, product_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.product_id)
        .bind(new.user_id)
        .bind(new.rating)
        .bind(new.comment.as_deref())
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<ReviewRow>, RepoError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            UPDATE reviews
            SET
                rating = COALESCE($2, rating),
                comment = CASE WHEN $3 = false THEN comment ELSE $4 END
            WHERE review_id = $1
            RETURNING review_id, product_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(review_id)
        .bind(patch.rating)
        .bind(patch.comment.is_some())
        .bind(patch.comment.flatten())
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, review_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM reviews
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
