/*
 * Responsibility
 * - Products request/response DTOs
 * - slug is derived from the name when the client does not send one
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::double_option;
use crate::repos::{
    Page,
    product_repo::{NewProduct, ProductFilter, ProductPatch, ProductRow},
};

const MAX_NAME_LEN: usize = 200;
const MAX_URL_LEN: usize = 2048;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListProductsQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category_id: self.category_id,
        }
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        match &self.slug {
            Some(slug) => validate_slug(slug)?,
            None if slugify(&self.name).is_empty() => {
                return Err("slug cannot be derived from name");
            }
            None => {}
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        Ok(())
    }

    pub fn into_new(self) -> NewProduct {
        let slug = self.slug.unwrap_or_else(|| slugify(&self.name));
        NewProduct {
            name: self.name.trim().to_string(),
            price: self.price,
            slug,
            description: self.description,
            image: self.image.unwrap_or_default(),
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.name.map(|n| n.trim().to_string()),
            price: self.price,
            slug: self.slug,
            description: self.description,
            image: self.image,
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub price: f64,
    pub slug: String,
    pub description: Option<String>,
    pub image: String,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.product_id,
            name: row.name,
            price: row.price,
            slug: row.slug,
            description: row.description,
            image: row.image,
            category_id: row.category_id,
            created_at: row.created_at,
        }
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    if name.len() > MAX_NAME_LEN {
        return Err("name must be <= 200 chars");
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), &'static str> {
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number");
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), &'static str> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_NAME_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !well_formed {
        return Err("slug must be lowercase letters, digits and '-'");
    }
    Ok(())
}

fn validate_image(image: &str) -> Result<(), &'static str> {
    if image.len() > MAX_URL_LEN {
        return Err("image must be <= 2048 chars");
    }
    Ok(())
}

/// "Red Shoes (XL)" → "red-shoes-xl"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn create(body: serde_json::Value) -> CreateProductRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Red Shoes (XL)"), "red-shoes-xl");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn create_derives_slug_when_missing() {
        let req = create(json!({ "name": "Blue Mug", "price": 12.5 }));
        assert!(req.validate().is_ok());

        let new = req.into_new();
        assert_eq!(new.slug, "blue-mug");
        assert_eq!(new.image, "");
    }

    #[test]
    fn create_rejects_bad_input() {
        assert!(create(json!({ "name": " ", "price": 1.0 })).validate().is_err());
        assert!(create(json!({ "name": "Mug", "price": -0.01 })).validate().is_err());
        assert!(create(json!({ "name": "Mug", "price": 1.0, "slug": "Mug" })).validate().is_err());
        assert!(create(json!({ "name": "日本", "price": 1.0 })).validate().is_err());
    }

    #[test]
    fn update_distinguishes_missing_and_null() {
        let req: UpdateProductRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.description, None);
        assert_eq!(req.category_id, None);

        let req: UpdateProductRequest =
            serde_json::from_value(json!({ "description": null, "category_id": null })).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.category_id, Some(None));

        let req: UpdateProductRequest =
            serde_json::from_value(json!({ "description": "new" })).unwrap();
        assert_eq!(req.description, Some(Some("new".to_string())));
    }
}
