//! In-memory token store.

use std::sync::{PoisonError, RwLock};

use crate::Result;
use crate::tokens::CredentialPair;
use crate::traits::TokenStore;

/// A [`TokenStore`] that lives for the lifetime of the process.
///
/// Useful for tests and for short-lived tools that log in on every run.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<CredentialPair>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a pair.
    pub fn with_tokens(tokens: CredentialPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn tokens(&self) -> Option<CredentialPair> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_tokens(&self, tokens: CredentialPair) -> Result<()> {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
        Ok(())
    }

    fn clear_tokens(&self) -> Result<()> {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_is_not_authenticated() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn set_tokens_replaces_both_values() {
        let store = MemoryTokenStore::with_tokens(CredentialPair::new("a1", "r1"));
        store.set_tokens(CredentialPair::new("a2", "r2")).unwrap();

        assert_eq!(store.access_token().unwrap().as_str(), "a2");
        assert_eq!(store.refresh_token().unwrap().as_str(), "r2");
    }

    #[test]
    fn clear_tokens_removes_both_values() {
        let store = MemoryTokenStore::with_tokens(CredentialPair::new("a1", "r1"));
        store.clear_tokens().unwrap();

        assert!(store.tokens().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_access_token_is_not_authenticated() {
        let store = MemoryTokenStore::with_tokens(CredentialPair::new("", "r1"));
        assert!(!store.is_authenticated());
        assert_eq!(store.refresh_token().unwrap().as_str(), "r1");
    }
}
