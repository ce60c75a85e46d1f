/*
 * Responsibility
 * - order_items access
 * - every write recomputes orders.total_price inside the same transaction
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}

/// A line to add to an order. `unit_price` is captured from the product at order time.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}

#[async_trait]
pub trait OrderItemRepo: Send + Sync {
    async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<OrderItemRow>, RepoError>;
    async fn add(&self, order_id: Uuid, item: NewOrderItem) -> Result<OrderItemRow, RepoError>;
    async fn remove(&self, order_id: Uuid, order_item_id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgOrderItemRepo {
    db: PgPool,
}

impl PgOrderItemRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub(crate) async fn insert_item(
    conn: &mut PgConnection,
    order_id: Uuid,
    item: &NewOrderItem,
) -> Result<OrderItemRow, RepoError> {
    let row = sqlx::query_as::<_, OrderItemRow>(
        r#"
        INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING order_item_id, order_id, product_id, quantity, unit_price
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub(crate) async fn refresh_order_total(
    conn: &mut PgConnection,
    order_id: Uuid,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        UPDATE orders
        SET total_price = COALESCE(
            (SELECT SUM(quantity * unit_price) FROM order_items WHERE order_id = $1),
            0
        )
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl OrderItemRepo for PgOrderItemRepo {
    async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<OrderItemRow>, RepoError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_item_id, order_id, product_id, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY order_item_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn add(&self, order_id: Uuid, item: NewOrderItem) -> Result<OrderItemRow, RepoError> {
        let mut tx = self.db.begin().await?;

        let row = insert_item(&mut tx, order_id, &item).await?;
        refresh_order_total(&mut tx, order_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn remove(&self, order_id: Uuid, order_item_id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM order_items
            WHERE order_id = $1 AND order_item_id = $2
            "#,
        )
        .bind(order_id)
        .bind(order_item_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        refresh_order_total(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(true)
    }
}
