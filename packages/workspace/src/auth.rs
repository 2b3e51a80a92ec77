//! Bearer token verification for the in-memory store.

use pagecraft_editor::{Credential, StoreError};
use std::collections::HashMap;

/// Maps a bearer token to the user id it was issued for
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<String>;
}

/// Fixed token table, for tests and local tools
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, String>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, uid: impl Into<String>) -> Self {
        self.insert(token, uid);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, uid: impl Into<String>) {
        self.tokens.insert(token.into(), uid.into());
    }
}

impl TokenVerifier for StaticTokens {
    fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// User id behind `credential`; a missing or unknown token is `Unauthorized`
pub fn authenticate(
    verifier: &dyn TokenVerifier,
    credential: Option<&Credential>,
) -> Result<String, StoreError> {
    let credential = credential.ok_or(StoreError::Unauthorized)?;
    verifier.verify(credential.token()).ok_or_else(|| {
        tracing::warn!("[Auth] rejected bearer token");
        StoreError::Unauthorized
    })
}

/// Like [`authenticate`], but an absent or invalid token means "guest"
pub fn identify(verifier: &dyn TokenVerifier, credential: Option<&Credential>) -> Option<String> {
    credential.and_then(|c| verifier.verify(c.token()))
}
