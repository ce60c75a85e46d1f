use serde_json::{Map, Value};
use uuid::Uuid;

/// Claim carrying the account's ban status, as a string (`"true"` / `"false"`).
pub const IS_BANNED_CLAIM: &str = "IsBanned";

/// The authenticated identity of one request.
///
/// Built by the credential verifier from a token that passed every check and
/// placed in the request extensions. Dropped with the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    claims: Map<String, Value>,
}

impl Principal {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// String value of a claim. Non-string values are not coerced.
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// The `sub` claim parsed as an internal user id.
    pub fn user_id(&self) -> Option<Uuid> {
        self.claim("sub").and_then(|s| Uuid::parse_str(s).ok())
    }
}
