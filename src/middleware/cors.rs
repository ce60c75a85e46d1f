//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native apps and server-to-server calls are not
//!   restricted by it.
//!
//! Policy:
//! - Origins: exact match against the configured allow-list (static per process).
//! - Methods / headers: whatever the preflight asks for.
//! - Credentials: allowed, but only ever advertised to listed origins.
//! - Unlisted origins get neither `Access-Control-Allow-Origin` nor
//!   `Access-Control-Allow-Credentials`, so the browser blocks the read.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, request::Parts};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply the CORS policy to the given Router.
///
/// IMPORTANT:
/// - Wildcards cannot be combined with credentials; `Config` rejects `*` and
///   methods/headers are mirrored instead of `Any`.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(&config.cors_allowed_origins))
}

pub fn layer(origins: &[String]) -> CorsLayer {
    let allowed: Arc<Vec<HeaderValue>> = Arc::new(
        origins
            .iter()
            .filter_map(|s| match HeaderValue::from_str(s) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %s, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect(),
    );

    let for_origin = allowed.clone();
    let for_credentials = allowed;

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| for_origin.iter().any(|v| v == origin),
        ))
        .allow_credentials(AllowCredentials::predicate(
            move |origin: &HeaderValue, _parts: &Parts| for_credentials.iter().any(|v| v == origin),
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(60 * 10))
}
