/*
 * Responsibility
 * - The "authenticated caller" type handlers see
 * - The access middleware verifies the token and stores a Principal in the
 *   request extensions; this type is derived from it
 */

use uuid::Uuid;

use crate::services::auth::Principal;

/// Context attached to an authenticated request.
///
/// `user_id` is the token's `sub`, used for ownership checks.
#[derive(Debug, Clone, Copy)]
pub struct AuthCtx {
    pub user_id: Uuid,
}

impl AuthCtx {
    /// `None` when the token carries no UUID subject.
    pub fn from_principal(principal: &Principal) -> Option<Self> {
        let user_id = principal.user_id()?;
        Some(Self { user_id })
    }
}
