/*
 * Responsibility
 * - products CRUD
 * - category_id is an optional FK; an unknown category surfaces as MissingReference
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::{Page, error::RepoError};

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub product_id: Uuid,
    pub name: Option<String>,
    pub price: f64,
    pub slug: String,
    pub description: Option<String>,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub slug: String,
    pub description: Option<String>,
    pub image: String,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub image: Option<String>,
    pub category_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductRow>, RepoError>;
    async fn get(&self, product_id: Uuid) -> Result<Option<ProductRow>, RepoError>;
    async fn create(&self, new: NewProduct) -> Result<ProductRow, RepoError>;
    async fn update(
        &self,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<ProductRow>, RepoError>;
    async fn delete(&self, product_id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductRow>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id, name, price, slug, description, image, created_at, category_id
            FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.category_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, product_id: Uuid) -> Result<Option<ProductRow>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id, name, price, slug, description, image, created_at, category_id
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewProduct) -> Result<ProductRow, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products
                (product_id, name, price, slug, description, image, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                product_id, name, price, slug, description, image, created_at, category_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.slug)
        .bind(new.description.as_deref())
        .bind(&new.image)
        .bind(new.category_id)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<ProductRow>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                slug = COALESCE($4, slug),
                description = CASE WHEN $5 = false THEN description ELSE $6 END,
                image = COALESCE($7, image),
                category_id = CASE WHEN $8 = false THEN category_id ELSE $9 END
            WHERE product_id = $1
            RETURNING
                product_id, name, price, slug, description, image, created_at, category_id
            "#,
        )
        .bind(product_id)
        .bind(patch.name.as_deref())
        .bind(patch.price)
        .bind(patch.slug.as_deref())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.image.as_deref())
        .bind(patch.category_id.is_some())
        .bind(patch.category_id.flatten())
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, product_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .execute(&self.db)
        .await
        .map_err(RepoError::from_sqlx_on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
