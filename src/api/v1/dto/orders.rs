/*
 * Responsibility
 * - Orders / order items DTOs
 * - clients send product ids and quantities only; prices are read from the
 *   products table when the line is created
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{
    Page,
    order_item_repo::OrderItemRow,
    order_repo::{OrderRow, OrderWithItems},
};

const MAX_LINES: usize = 100;
const MAX_QUANTITY: i32 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListOrdersQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl OrderLineRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(1..=MAX_QUANTITY).contains(&self.quantity) {
            return Err("quantity must be between 1 and 1000");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.items.is_empty() {
            return Err("an order needs at least one item");
        }
        if self.items.len() > MAX_LINES {
            return Err("an order can have at most 100 items");
        }
        self.items.iter().try_for_each(OrderLineRequest::validate)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}

impl From<OrderItemRow> for OrderItemResponse {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.order_item_id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

impl From<OrderRow> for OrderResponse {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.order_id,
            user_id: row.user_id,
            status: row.status,
            total_price: row.total_price,
            created_at: row.created_at,
            items: None,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(o: OrderWithItems) -> Self {
        let mut res = OrderResponse::from(o.order);
        res.items = Some(o.items.into_iter().map(OrderItemResponse::from).collect());
        res
    }
}
