//! Outermost failure translation.
//!
//! `AppError` already covers everything handlers and the auth layers return.
//! This module catches what slips past them: panics anywhere in the stack,
//! requests that match no route or no method, and the body-limit rejection
//! that tower-http answers on its own. All of them leave with the same JSON
//! body as every other error.

use std::any::Any;

use axum::{
    Router,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

/// Wrap everything but CORS, so that a listed origin can still read these bodies.
pub fn apply(router: Router) -> Router {
    router
        .layer(middleware::map_response(uniform_limit_rejection))
        .layer(CatchPanicLayer::custom(panic_response))
}

pub async fn fallback() -> AppError {
    AppError::not_found("route")
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// `RequestBodyLimitLayer` rejects an oversized `Content-Length` with a
/// plain-text 413 before any handler runs.
async fn uniform_limit_rejection(res: Response) -> Response {
    if res.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json(&res) {
        return res;
    }
    AppError::PayloadTooLarge.into_response()
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    };

    AppError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
