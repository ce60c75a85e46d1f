pub mod policy;
pub mod principal;
pub mod verifier;

pub use policy::{Authorizer, Decision, REQUIRED_NOT_BANNED};
pub use principal::Principal;
pub use verifier::CredentialVerifier;
