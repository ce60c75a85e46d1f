/*
 * Responsibility
 * - The v1 route table: (method, path) → handler, built once at startup
 * - Three groups:
 *   - public: no credentials
 *   - authenticated: a verified token is enough
 *   - not_banned: a verified token whose claims pass RequiredNotBanned
 * - Groups are merged; axum combines method routers that share a path
 * - Auth layers sit on the method routers, not on the Router: a Router-level
 *   route_layer would also wrap the 405 fallback of a partly public path
 */
use axum::{
    Router,
    routing::{MethodRouter, delete, get, post, put},
};

use crate::api::v1::handlers::{
    categories::{create_category, delete_category, get_category, list_categories, update_category},
    health::health,
    orders::{
        add_order_item, create_order, delete_order, get_order, list_order_items, list_orders,
        remove_order_item,
    },
    products::{create_product, delete_product, get_product, list_products, update_product},
    reviews::{create_review, delete_review, get_review, list_reviews, update_review},
    users::{get_me, update_me},
};
use crate::middleware::{
    auth::{access, policy},
    errors::method_not_allowed,
};
use crate::services::auth::REQUIRED_NOT_BANNED;
use crate::state::AppState;

/// Every policy name referenced by the route table. Checked against the
/// authorizer at startup.
pub const PROTECTED_POLICIES: &[&str] = &[REQUIRED_NOT_BANNED];

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public())
        .merge(authenticated(&state))
        .merge(not_banned(&state))
        .method_not_allowed_fallback(method_not_allowed)
}

fn public() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/categories", get(list_categories))
        .route("/categories/{category_id}", get(get_category))
        .route("/reviews", get(list_reviews))
        .route("/reviews/{review_id}", get(get_review))
}

fn authenticated(state: &AppState) -> Router<AppState> {
    Router::new().route("/users/me", access::apply(get(get_me), state.clone()))
}

fn not_banned(state: &AppState) -> Router<AppState> {
    // Layer order: the last one applied runs first.
    let guard = |handlers: MethodRouter<AppState>| {
        access::apply(
            policy::require(handlers, state, REQUIRED_NOT_BANNED),
            state.clone(),
        )
    };

    Router::new()
        .route("/products", guard(post(create_product)))
        .route(
            "/products/{product_id}",
            guard(put(update_product).delete(delete_product)),
        )
        .route("/categories", guard(post(create_category)))
        .route(
            "/categories/{category_id}",
            guard(put(update_category).delete(delete_category)),
        )
        .route("/reviews", guard(post(create_review)))
        .route(
            "/reviews/{review_id}",
            guard(put(update_review).delete(delete_review)),
        )
        .route("/orders", guard(get(list_orders).post(create_order)))
        .route("/orders/{order_id}", guard(get(get_order).delete(delete_order)))
        .route(
            "/orders/{order_id}/items",
            guard(get(list_order_items).post(add_order_item)),
        )
        .route(
            "/orders/{order_id}/items/{order_item_id}",
            guard(delete(remove_order_item)),
        )
        .route("/users/me", guard(put(update_me)))
}
