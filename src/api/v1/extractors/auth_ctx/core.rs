use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Principal;

use super::AuthCtx;

/// Extractor for the authenticated caller.
///
/// Relies on the access middleware having inserted a `Principal` into the
/// request extensions. Answers 401 when it is missing (route not behind the
/// middleware) or when the token has no usable `sub`.
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .ok_or(AppError::Unauthorized)?;

        AuthCtx::from_principal(principal)
            .map(AuthCtxExtractor)
            .ok_or_else(|| {
                tracing::warn!("token accepted but carries no usable subject");
                AppError::Unauthorized
            })
    }
}
