/*
 * Responsibility
 * - /products handlers
 * - reads are public, writes sit behind authentication + RequiredNotBanned (see routes)
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::products::{
            CreateProductRequest, ListProductsQuery, ProductResponse, UpdateProductRequest,
        },
        extractors::{ApiJson, ApiPath, ApiQuery, AuthCtxExtractor},
        handlers::invalid,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = state
        .store
        .products
        .list(query.filter(), query.page())
        .await?;

    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = state
        .store
        .products
        .get(product_id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate().map_err(invalid)?;

    let row = state.store.products.create(req.into_new()).await?;
    tracing::info!(user_id = %ctx.user_id, product_id = %row.product_id, "product created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(product_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let row = state
        .store
        .products
        .update(product_id, req.into_patch())
        .await?
        .ok_or(AppError::not_found("product"))?;
    tracing::info!(user_id = %ctx.user_id, %product_id, "product updated");

    Ok(Json(row.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(product_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.products.delete(product_id).await? {
        return Err(AppError::not_found("product"));
    }
    tracing::info!(user_id = %ctx.user_id, %product_id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}
