/*
 * Responsibility
 * - Request/response DTOs per resource
 * - validate(): shape checks before anything reaches a repository
 * - From<Row>: explicit row → response mapping
 */
use serde::{Deserialize, Deserializer};

pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

/// Tri-state field for partial updates:
/// - field missing → `None` (leave unchanged)
/// - `null` → `Some(None)` (clear)
/// - value → `Some(Some(v))`
///
/// Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
