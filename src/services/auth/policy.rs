//! Claims-based authorization.
//!
//! Policies are built once at startup and never change afterwards, so the
//! `Authorizer` is shared behind an `Arc` without locking.

use std::collections::HashMap;

use thiserror::Error;

use crate::services::auth::principal::{IS_BANNED_CLAIM, Principal};

/// Allow only accounts whose `IsBanned` claim is exactly the string `"false"`.
pub const REQUIRED_NOT_BANNED: &str = "RequiredNotBanned";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown policy: {0}")]
pub struct UnknownPolicy(pub String);

/// A single condition over the principal's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The claim is present, is a string, and equals `value` byte for byte.
    ClaimEquals { claim: String, value: String },
}

impl Requirement {
    fn is_met(&self, principal: &Principal) -> bool {
        match self {
            Requirement::ClaimEquals { claim, value } => principal.claim(claim) == Some(value.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    name: String,
    requirements: Vec<Requirement>,
}

impl Policy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
        }
    }

    pub fn require_claim(mut self, claim: impl Into<String>, value: impl Into<String>) -> Self {
        self.requirements.push(Requirement::ClaimEquals {
            claim: claim.into(),
            value: value.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every requirement must hold.
    pub fn evaluate(&self, principal: &Principal) -> Decision {
        if self.requirements.iter().all(|r| r.is_met(principal)) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Named policy table.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    policies: HashMap<String, Policy>,
}

impl Authorizer {
    pub fn new(policies: impl IntoIterator<Item = Policy>) -> Self {
        Self {
            policies: policies
                .into_iter()
                .map(|p| (p.name().to_string(), p))
                .collect(),
        }
    }

    /// The policies every deployment registers.
    pub fn with_default_policies() -> Self {
        Self::new([Policy::new(REQUIRED_NOT_BANNED).require_claim(IS_BANNED_CLAIM, "false")])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn authorize(&self, principal: &Principal, policy: &str) -> Result<Decision, UnknownPolicy> {
        self.policies
            .get(policy)
            .map(|p| p.evaluate(principal))
            .ok_or_else(|| UnknownPolicy(policy.to_string()))
    }
}
