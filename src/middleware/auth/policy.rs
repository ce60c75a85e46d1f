//! Named claims policy check for a group of routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{Authorizer, Decision, Principal};
use crate::state::AppState;

#[derive(Clone)]
struct PolicyGate {
    authorizer: Arc<Authorizer>,
    policy: &'static str,
}

/// Require `policy` on every method handler of `handlers`.
///
/// Expects `access::apply` to be layered outside of this one.
pub fn require(
    handlers: MethodRouter<AppState>,
    state: &AppState,
    policy: &'static str,
) -> MethodRouter<AppState> {
    let gate = PolicyGate {
        authorizer: state.authorizer.clone(),
        policy,
    };
    handlers.route_layer(middleware::from_fn_with_state(gate, policy_middleware))
}

async fn policy_middleware(
    State(gate): State<PolicyGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // No principal means authentication was not layered in front of us.
    let Some(principal) = req.extensions().get::<Principal>() else {
        tracing::error!(policy = gate.policy, "policy layer reached without a principal");
        return Err(AppError::Unauthorized);
    };

    let decision = gate
        .authorizer
        .authorize(principal, gate.policy)
        .map_err(AppError::internal)?;

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny => {
            tracing::info!(
                policy = gate.policy,
                sub = principal.claim("sub").unwrap_or("-"),
                "policy denied"
            );
            Err(AppError::Forbidden)
        }
    }
}
