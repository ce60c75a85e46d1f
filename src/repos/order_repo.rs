/*
 * Responsibility
 * - orders access, always scoped by the owning user for listing
 * - create inserts the order and its lines in one transaction
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::{
    Page,
    error::RepoError,
    order_item_repo::{self, NewOrderItem, OrderItemRow},
};

pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderRow,
    pub items: Vec<OrderItemRow>,
}

#[async_trait]
pub trait OrderRepo: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid, page: Page) -> Result<Vec<OrderRow>, RepoError>;
    async fn get(&self, order_id: Uuid) -> Result<Option<OrderRow>, RepoError>;
    async fn create(&self, new: NewOrder) -> Result<OrderWithItems, RepoError>;
    async fn delete(&self, order_id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgOrderRepo {
    db: PgPool,
}

impl PgOrderRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepo for PgOrderRepo {
    async fn list_for_user(&self, user_id: Uuid, page: Page) -> Result<Vec<OrderRow>, RepoError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, status, total_price, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, order_id: Uuid) -> Result<Option<OrderRow>, RepoError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, status, total_price, created_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewOrder) -> Result<OrderWithItems, RepoError> {
        let mut tx = self.db.begin().await?;

        let order_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, status, total_price)
            VALUES ($1, $2, $3, 0)
            "#,
        )
        .bind(order_id)
        .bind(new.user_id)
        .bind(STATUS_PENDING)
        .execute(&mut *tx)
        .await
        .map_err(RepoError::from_sqlx)?;

        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            items.push(order_item_repo::insert_item(&mut tx, order_id, item).await?);
        }
        order_item_repo::refresh_order_total(&mut tx, order_id).await?;

        let order = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, status, total_price, created_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    async fn delete(&self, order_id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
