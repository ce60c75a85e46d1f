/*
 * Responsibility
 * - The shared request context handed to every handler (AppState)
 *   - store: repository handles
 *   - verifier / authorizer: immutable after startup
 * - Clone is cheap (everything inside is Arc)
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::services::auth::{Authorizer, CredentialVerifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Store,
    pub verifier: Arc<CredentialVerifier>,
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    pub fn new(store: Store, verifier: CredentialVerifier, authorizer: Authorizer) -> Self {
        Self {
            store,
            verifier: Arc::new(verifier),
            authorizer: Arc::new(authorizer),
        }
    }
}
