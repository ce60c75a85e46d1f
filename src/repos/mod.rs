/*
 * Responsibility
 * - One repository trait per entity + its Postgres implementation
 * - Store: the bundle of repository handles carried in AppState
 */
use std::sync::Arc;

use sqlx::PgPool;

pub mod category_repo;
pub mod error;
pub mod order_item_repo;
pub mod order_repo;
pub mod product_repo;
pub mod review_repo;
pub mod user_repo;

#[cfg(test)]
pub mod memory;

use category_repo::{CategoryRepo, PgCategoryRepo};
use order_item_repo::{OrderItemRepo, PgOrderItemRepo};
use order_repo::{OrderRepo, PgOrderRepo};
use product_repo::{PgProductRepo, ProductRepo};
use review_repo::{PgReviewRepo, ReviewRepo};
use user_repo::{PgUserRepo, UserRepo};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// LIMIT/OFFSET window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Clamp caller-supplied values into a safe window.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Clone)]
pub struct Store {
    pub products: Arc<dyn ProductRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub reviews: Arc<dyn ReviewRepo>,
    pub orders: Arc<dyn OrderRepo>,
    pub order_items: Arc<dyn OrderItemRepo>,
    pub users: Arc<dyn UserRepo>,
}

impl Store {
    pub fn postgres(db: PgPool) -> Self {
        Self {
            products: Arc::new(PgProductRepo::new(db.clone())),
            categories: Arc::new(PgCategoryRepo::new(db.clone())),
            reviews: Arc::new(PgReviewRepo::new(db.clone())),
            orders: Arc::new(PgOrderRepo::new(db.clone())),
            order_items: Arc::new(PgOrderItemRepo::new(db.clone())),
            users: Arc::new(PgUserRepo::new(db)),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
