use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::categories::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
        extractors::{ApiJson, ApiPath, AuthCtxExtractor},
        handlers::invalid,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = state.store.categories.list().await?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = state
        .store
        .categories
        .get(category_id)
        .await?
        .ok_or(AppError::not_found("category"))?;

    Ok(Json(row.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    req.validate().map_err(invalid)?;

    let row = state.store.categories.create(req.into_new()).await?;
    tracing::info!(user_id = %ctx.user_id, category_id = %row.category_id, "category created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let row = state
        .store
        .categories
        .update(category_id, req.into_patch())
        .await?
        .ok_or(AppError::not_found("category"))?;

    Ok(Json(row.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.categories.delete(category_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("category"))
    }
}
