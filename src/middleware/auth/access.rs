//! Bearer token verification → Principal in request extensions.
//!
//! Every rejection (missing header, wrong scheme, bad signature, wrong
//! issuer/audience, expired) produces the same 401 body. The concrete reason
//! only goes to the log.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::state::AppState;

/// Require authentication on every method handler of `handlers`.
///
/// Layered per method router, so the 405 fallback of a path that also has
/// public methods stays reachable without credentials.
/// Apply this *after* any `policy::require` so that it runs first.
pub fn apply(handlers: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    handlers.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!("missing or malformed authorization header");
        return Err(AppError::Unauthorized);
    };

    let principal = match state.verifier.verify_now(token) {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`; the scheme name is case-insensitive.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer    ")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
    }
}
