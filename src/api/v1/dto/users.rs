/*
 * Responsibility
 * - Users request/response DTOs (the caller's own profile)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::{UserPatch, UserRow};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        for name in [&self.first_name, &self.last_name].into_iter().flatten() {
            if name.trim().is_empty() {
                return Err("names cannot be empty");
            }
            if name.len() > 100 {
                return Err("names must be <= 100 chars");
            }
        }
        Ok(())
    }

    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            first_name: self.first_name.map(|n| n.trim().to_string()),
            last_name: self.last_name.map(|n| n.trim().to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            is_banned: row.is_banned,
            created_at: row.created_at,
        }
    }
}
