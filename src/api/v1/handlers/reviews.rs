/*
 * Responsibility
 * - /reviews handlers
 * - reviews are public, so editing someone else's review is a 403 (not a 404)
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::reviews::{
            CreateReviewRequest, ListReviewsQuery, ReviewResponse, UpdateReviewRequest,
        },
        extractors::{ApiJson, ApiPath, ApiQuery, AuthCtx, AuthCtxExtractor},
        handlers::invalid,
    },
    error::AppError,
    repos::review_repo::ReviewRow,
    state::AppState,
};

async fn owned_review(
    state: &AppState,
    ctx: &AuthCtx,
    review_id: Uuid,
) -> Result<ReviewRow, AppError> {
    let row = state
        .store
        .reviews
        .get(review_id)
        .await?
        .ok_or(AppError::not_found("review"))?;

    if row.user_id != ctx.user_id {
        tracing::info!(user_id = %ctx.user_id, %review_id, "review owned by another user");
        return Err(AppError::Forbidden);
    }
    Ok(row)
}

pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListReviewsQuery>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let rows = state
        .store
        .reviews
        .list(query.product_id, query.page())
        .await?;

    Ok(Json(rows.into_iter().map(ReviewResponse::from).collect()))
}

pub async fn get_review(
    State(state): State<AppState>,
    ApiPath(review_id): ApiPath<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let row = state
        .store
        .reviews
        .get(review_id)
        .await?
        .ok_or(AppError::not_found("review"))?;

    Ok(Json(row.into()))
}

pub async fn create_review(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    req.validate().map_err(invalid)?;

    if state.store.products.get(req.product_id).await?.is_none() {
        return Err(AppError::bad_request(
            "INVALID_REFERENCE",
            "review references an unknown product",
        ));
    }

    let row = state.store.reviews.create(req.into_new(ctx.user_id)).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_review(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(review_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    req.validate().map_err(invalid)?;
    owned_review(&state, &ctx, review_id).await?;

    let row = state
        .store
        .reviews
        .update(review_id, req.into_patch())
        .await?
        .ok_or(AppError::not_found("review"))?;

    Ok(Json(row.into()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(review_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_review(&state, &ctx, review_id).await?;

    if state.store.reviews.delete(review_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("review"))
    }
}
