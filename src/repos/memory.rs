//! In-memory repositories for handler and pipeline tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::{
    Page, Store,
    category_repo::{CategoryPatch, CategoryRepo, CategoryRow, NewCategory},
    error::RepoError,
    order_item_repo::{NewOrderItem, OrderItemRepo, OrderItemRow},
    order_repo::{NewOrder, OrderRepo, OrderRow, OrderWithItems, STATUS_PENDING},
    product_repo::{NewProduct, ProductFilter, ProductPatch, ProductRepo, ProductRow},
    review_repo::{NewReview, ReviewPatch, ReviewRepo, ReviewRow},
    user_repo::{UserPatch, UserRepo, UserRow},
};

#[derive(Default)]
struct Tables {
    products: Vec<ProductRow>,
    categories: Vec<CategoryRow>,
    reviews: Vec<ReviewRow>,
    orders: Vec<OrderRow>,
    items: Vec<OrderItemRow>,
    users: Vec<UserRow>,
}

impl Tables {
    fn refresh_total(&mut self, order_id: Uuid) {
        let total = self
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| f64::from(i.quantity) * i.unit_price)
            .sum();
        if let Some(order) = self.orders.iter_mut().find(|o| o.order_id == order_id) {
            order.total_price = total;
        }
    }

    fn new_item(order_id: Uuid, item: &NewOrderItem) -> OrderItemRow {
        OrderItemRow {
            order_item_id: Uuid::new_v4(),
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn store(self: &Arc<Self>) -> Store {
        Store {
            products: self.clone(),
            categories: self.clone(),
            reviews: self.clone(),
            orders: self.clone(),
            order_items: self.clone(),
            users: self.clone(),
        }
    }

    pub fn seed_product(&self, name: &str, price: f64) -> ProductRow {
        let row = ProductRow {
            product_id: Uuid::new_v4(),
            name: Some(name.to_string()),
            price,
            slug: name.to_ascii_lowercase().replace(' ', "-"),
            description: None,
            image: String::new(),
            created_at: Utc::now(),
            category_id: None,
        };
        self.tables().products.push(row.clone());
        row
    }

    pub fn seed_user(&self, user_id: Uuid, is_banned: bool) -> UserRow {
        let row = UserRow {
            user_id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: format!("{user_id}@example.test"),
            is_banned,
            created_at: Utc::now(),
        };
        self.tables().users.push(row.clone());
        row
    }

    pub fn product_count(&self) -> usize {
        self.tables().products.len()
    }
}

fn window<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset as usize).take(page.limit as usize).collect()
}

#[async_trait]
impl ProductRepo for MemoryStore {
    async fn list(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductRow>, RepoError> {
        let t = self.tables();
        let rows = t
            .products
            .iter()
            .filter(|p| filter.category_id.is_none() || p.category_id == filter.category_id)
            .cloned();
        Ok(window(rows, page))
    }

    async fn get(&self, product_id: Uuid) -> Result<Option<ProductRow>, RepoError> {
        Ok(self.tables().products.iter().find(|p| p.product_id == product_id).cloned())
    }

    async fn create(&self, new: NewProduct) -> Result<ProductRow, RepoError> {
        let mut t = self.tables();
        if t.products.iter().any(|p| p.slug == new.slug) {
            return Err(RepoError::Conflict);
        }
        let known_category = new
            .category_id
            .is_none_or(|cid| t.categories.iter().any(|c| c.category_id == cid));
        if !known_category {
            return Err(RepoError::MissingReference);
        }
        let row = ProductRow {
            product_id: Uuid::new_v4(),
            name: Some(new.name),
            price: new.price,
            slug: new.slug,
            description: new.description,
            image: new.image,
            created_at: Utc::now(),
            category_id: new.category_id,
        };
        t.products.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<ProductRow>, RepoError> {
        let mut t = self.tables();
        let Some(row) = t.products.iter_mut().find(|p| p.product_id == product_id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = Some(name);
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        if let Some(slug) = patch.slug {
            row.slug = slug;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        if let Some(image) = patch.image {
            row.image = image;
        }
        if let Some(category_id) = patch.category_id {
            row.category_id = category_id;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, product_id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.tables();
        let before = t.products.len();
        t.products.retain(|p| p.product_id != product_id);
        Ok(t.products.len() != before)
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<CategoryRow>, RepoError> {
        Ok(self.tables().categories.clone())
    }

    async fn get(&self, category_id: Uuid) -> Result<Option<CategoryRow>, RepoError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .find(|c| c.category_id == category_id)
            .cloned())
    }

    async fn create(&self, new: NewCategory) -> Result<CategoryRow, RepoError> {
        let row = CategoryRow {
            category_id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            created_at: Utc::now(),
        };
        self.tables().categories.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        category_id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<CategoryRow>, RepoError> {
        let mut t = self.tables();
        let Some(row) = t.categories.iter_mut().find(|c| c.category_id == category_id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, category_id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.tables();
        if t.products.iter().any(|p| p.category_id == Some(category_id)) {
            return Err(RepoError::Conflict);
        }
        let before = t.categories.len();
        t.categories.retain(|c| c.category_id != category_id);
        Ok(t.categories.len() != before)
    }
}

#[async_trait]
impl ReviewRepo for MemoryStore {
    async fn list(&self, product_id: Option<Uuid>, page: Page) -> Result<Vec<ReviewRow>, RepoError> {
        let t = self.tables();
        let rows = t
            .reviews
            .iter()
            .filter(|r| product_id.is_none_or(|pid| r.product_id == pid))
            .cloned();
        Ok(window(rows, page))
    }

    async fn get(&self, review_id: Uuid) -> Result<Option<ReviewRow>, RepoError> {
        Ok(self.tables().reviews.iter().find(|r| r.review_id == review_id).cloned())
    }

    async fn create(&self, new: NewReview) -> Result<ReviewRow, RepoError> {
        let row = ReviewRow {
            review_id: Uuid::new_v4(),
            product_id: new.product_id,
            user_id: new.user_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        self.tables().reviews.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<ReviewRow>, RepoError> {
        let mut t = self.tables();
        let Some(row) = t.reviews.iter_mut().find(|r| r.review_id == review_id) else {
            return Ok(None);
        };
        if let Some(rating) = patch.rating {
            row.rating = rating;
        }
        if let Some(comment) = patch.comment {
            row.comment = comment;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, review_id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.tables();
        let before = t.reviews.len();
        t.reviews.retain(|r| r.review_id != review_id);
        Ok(t.reviews.len() != before)
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid, page: Page) -> Result<Vec<OrderRow>, RepoError> {
        let t = self.tables();
        let rows = t.orders.iter().filter(|o| o.user_id == user_id).cloned();
        Ok(window(rows, page))
    }

    async fn get(&self, order_id: Uuid) -> Result<Option<OrderRow>, RepoError> {
        Ok(self.tables().orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    async fn create(&self, new: NewOrder) -> Result<OrderWithItems, RepoError> {
        let mut t = self.tables();
        let order_id = Uuid::new_v4();
        t.orders.push(OrderRow {
            order_id,
            user_id: new.user_id,
            status: STATUS_PENDING.to_string(),
            total_price: 0.0,
            created_at: Utc::now(),
        });
        let items: Vec<OrderItemRow> = new
            .items
            .iter()
            .map(|i| Tables::new_item(order_id, i))
            .collect();
        t.items.extend(items.iter().cloned());
        t.refresh_total(order_id);

        let order = t
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
            .ok_or(RepoError::MissingReference)?;
        Ok(OrderWithItems { order, items })
    }

    async fn delete(&self, order_id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.tables();
        t.items.retain(|i| i.order_id != order_id);
        let before = t.orders.len();
        t.orders.retain(|o| o.order_id != order_id);
        Ok(t.orders.len() != before)
    }
}

#[async_trait]
impl OrderItemRepo for MemoryStore {
    async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<OrderItemRow>, RepoError> {
        Ok(self
            .tables()
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn add(&self, order_id: Uuid, item: NewOrderItem) -> Result<OrderItemRow, RepoError> {
        let mut t = self.tables();
        let row = Tables::new_item(order_id, &item);
        t.items.push(row.clone());
        t.refresh_total(order_id);
        Ok(row)
    }

    async fn remove(&self, order_id: Uuid, order_item_id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.tables();
        let before = t.items.len();
        t.items
            .retain(|i| !(i.order_id == order_id && i.order_item_id == order_item_id));
        let removed = t.items.len() != before;
        if removed {
            t.refresh_total(order_id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        Ok(self.tables().users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn update(&self, user_id: Uuid, patch: UserPatch) -> Result<Option<UserRow>, RepoError> {
        let mut t = self.tables();
        let Some(row) = t.users.iter_mut().find(|u| u.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(first_name) = patch.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            row.last_name = last_name;
        }
        Ok(Some(row.clone()))
    }
}

/// A product repository whose every call fails the way a dropped database would.
pub struct BrokenProducts;

#[async_trait]
impl ProductRepo for BrokenProducts {
    async fn list(&self, _: ProductFilter, _: Page) -> Result<Vec<ProductRow>, RepoError> {
        Err(broken())
    }

    async fn get(&self, _: Uuid) -> Result<Option<ProductRow>, RepoError> {
        Err(broken())
    }

    async fn create(&self, _: NewProduct) -> Result<ProductRow, RepoError> {
        Err(broken())
    }

    async fn update(&self, _: Uuid, _: ProductPatch) -> Result<Option<ProductRow>, RepoError> {
        Err(broken())
    }

    async fn delete(&self, _: Uuid) -> Result<bool, RepoError> {
        Err(broken())
    }
}

fn broken() -> RepoError {
    RepoError::Db(sqlx::Error::Protocol(
        "connection to 10.0.0.5:5432 reset; password authentication failed for user shop".into(),
    ))
}
