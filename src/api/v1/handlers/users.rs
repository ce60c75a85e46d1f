/*
 * Responsibility
 * - /users/me: the caller's own profile, resolved from the token's sub
 * - reading works for banned accounts too; editing requires RequiredNotBanned
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::users::{UpdateUserRequest, UserResponse},
        extractors::{ApiJson, AuthCtxExtractor},
        handlers::invalid,
    },
    error::AppError,
    state::AppState,
};

pub async fn get_me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .store
        .users
        .get(ctx.user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn update_me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let row = state
        .store
        .users
        .update(ctx.user_id, req.into_patch())
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}
