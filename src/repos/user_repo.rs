/*
 * Responsibility
 * - users table access
 * - rows are created by the token issuer's sign-up flow; this service only reads
 *   and edits profile fields
 * - is_banned is owned by the issuer side and mirrored into the IsBanned claim
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError>;
    async fn update(&self, user_id: Uuid, patch: UserPatch) -> Result<Option<UserRow>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, first_name, last_name, email, is_banned, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, user_id: Uuid, patch: UserPatch) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
            WHERE user_id = $1
            RETURNING user_id, first_name, last_name, email, is_banned, created_at
            "#,
        )
        .bind(user_id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}
