/*
 * Responsibility
 * - Reviews request/response DTOs
 * - the author is never part of the request body; it comes from the token
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::double_option;
use crate::repos::{
    Page,
    review_repo::{NewReview, ReviewPatch, ReviewRow},
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct ListReviewsQuery {
    pub product_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListReviewsQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_rating(self.rating)?;
        if let Some(comment) = &self.comment {
            validate_comment(comment)?;
        }
        Ok(())
    }

    pub fn into_new(self, user_id: Uuid) -> NewReview {
        NewReview {
            product_id: self.product_id,
            user_id,
            rating: self.rating,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub comment: Option<Option<String>>,
}

impl UpdateReviewRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(Some(comment)) = &self.comment {
            validate_comment(comment)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> ReviewPatch {
        ReviewPatch {
            rating: self.rating,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.review_id,
            product_id: row.product_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err("rating must be between 1 and 5");
    }
    Ok(())
}

fn validate_comment(comment: &str) -> Result<(), &'static str> {
    if comment.len() > MAX_COMMENT_LEN {
        return Err("comment must be <= 2000 chars");
    }
    Ok(())
}
