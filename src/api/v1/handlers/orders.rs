/*
 * Responsibility
 * - /orders and /orders/{id}/items handlers
 * - orders are private: an order owned by someone else answers 404 so that
 *   order ids cannot be probed
 * - line prices are read from products at the time the line is created
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::orders::{
            CreateOrderRequest, ListOrdersQuery, OrderItemResponse, OrderLineRequest,
            OrderResponse,
        },
        extractors::{ApiJson, ApiPath, ApiQuery, AuthCtx, AuthCtxExtractor},
        handlers::invalid,
    },
    error::AppError,
    repos::{
        order_item_repo::NewOrderItem,
        order_repo::{NewOrder, OrderRow, OrderWithItems},
    },
    state::AppState,
};

async fn owned_order(state: &AppState, ctx: &AuthCtx, order_id: Uuid) -> Result<OrderRow, AppError> {
    match state.store.orders.get(order_id).await? {
        Some(order) if order.user_id == ctx.user_id => Ok(order),
        Some(_) => {
            tracing::info!(user_id = %ctx.user_id, %order_id, "order owned by another user");
            Err(AppError::not_found("order"))
        }
        None => Err(AppError::not_found("order")),
    }
}

async fn priced_line(state: &AppState, line: &OrderLineRequest) -> Result<NewOrderItem, AppError> {
    let product = state
        .store
        .products
        .get(line.product_id)
        .await?
        .ok_or_else(|| AppError::bad_request("UNKNOWN_PRODUCT", "order references an unknown product"))?;

    Ok(NewOrderItem {
        product_id: product.product_id,
        quantity: line.quantity,
        unit_price: product.price,
    })
}

pub async fn list_orders(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let rows = state
        .store
        .orders
        .list_for_user(ctx.user_id, query.page())
        .await?;

    Ok(Json(rows.into_iter().map(OrderResponse::from).collect()))
}

pub async fn get_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(order_id): ApiPath<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = owned_order(&state, &ctx, order_id).await?;
    let items = state.store.order_items.list_for_order(order_id).await?;

    Ok(Json(OrderWithItems { order, items }.into()))
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    req.validate().map_err(invalid)?;

    let mut items = Vec::with_capacity(req.items.len());
    for line in &req.items {
        items.push(priced_line(&state, line).await?);
    }

    let created = state
        .store
        .orders
        .create(NewOrder {
            user_id: ctx.user_id,
            items,
        })
        .await?;
    tracing::info!(
        user_id = %ctx.user_id,
        order_id = %created.order.order_id,
        total = created.order.total_price,
        "order created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn delete_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(order_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_order(&state, &ctx, order_id).await?;

    if state.store.orders.delete(order_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("order"))
    }
}

pub async fn list_order_items(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(order_id): ApiPath<Uuid>,
) -> Result<Json<Vec<OrderItemResponse>>, AppError> {
    owned_order(&state, &ctx, order_id).await?;

    let rows = state.store.order_items.list_for_order(order_id).await?;
    Ok(Json(rows.into_iter().map(OrderItemResponse::from).collect()))
}

pub async fn add_order_item(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(order_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<OrderLineRequest>,
) -> Result<(StatusCode, Json<OrderItemResponse>), AppError> {
    req.validate().map_err(invalid)?;
    owned_order(&state, &ctx, order_id).await?;

    let item = priced_line(&state, &req).await?;
    let row = state.store.order_items.add(order_id, item).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn remove_order_item(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath((order_id, order_item_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    owned_order(&state, &ctx, order_id).await?;

    if state.store.order_items.remove(order_id, order_item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("order item"))
    }
}
