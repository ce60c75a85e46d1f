use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::double_option;
use crate::repos::category_repo::{CategoryPatch, CategoryRow, NewCategory};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.name)
    }

    pub fn into_new(self) -> NewCategory {
        NewCategory {
            name: self.name.trim().to_string(),
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> CategoryPatch {
        CategoryPatch {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.category_id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    if name.len() > 100 {
        return Err("name must be <= 100 chars");
    }
    Ok(())
}
