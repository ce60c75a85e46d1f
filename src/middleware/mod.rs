/*
 * Responsibility
 * - Router-level layers, in pipeline order from the outside in:
 *   cors → errors (panic/limit/fallback translation)
 *   → http (request id, trace, limits, timeout)
 *   → auth::access (authentication) → auth::policy (authorization),
 *   the last two on the protected method routers only
 */
pub mod auth;
pub mod cors;
pub mod errors;
pub mod http;
