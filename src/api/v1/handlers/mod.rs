/*
 * Responsibility
 * - v1 handlers, one module per resource
 * - handlers only: extract → validate → repository → map to response
 */
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use crate::error::AppError;

pub(crate) fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_FAILED", message)
}
