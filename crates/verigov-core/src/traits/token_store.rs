//! Credential storage trait.

use crate::tokens::{AccessToken, CredentialPair, RefreshToken};
use crate::Result;

/// Client-local holder of the current [`CredentialPair`].
///
/// A store has no network awareness and performs no validation of token
/// shape or expiry; expiry is discovered only by a failed call. Writes
/// replace or remove the whole pair, so readers never observe one token
/// from an old pair and one from a new pair.
///
/// Empty tokens are reported as absent.
pub trait TokenStore: Send + Sync {
    /// Returns a snapshot of the current pair, if any.
    fn tokens(&self) -> Option<CredentialPair>;

    /// Replaces both tokens.
    fn set_tokens(&self, tokens: CredentialPair) -> Result<()>;

    /// Removes both tokens.
    fn clear_tokens(&self) -> Result<()>;

    /// Returns the current access token, if present and non-empty.
    fn access_token(&self) -> Option<AccessToken> {
        self.tokens()
            .map(|pair| pair.access_token)
            .filter(|token| !token.is_empty())
    }

    /// Returns the current refresh token, if present and non-empty.
    fn refresh_token(&self) -> Option<RefreshToken> {
        self.tokens()
            .map(|pair| pair.refresh_token)
            .filter(|token| !token.is_empty())
    }

    /// Returns true iff an access token is present. Does not validate it.
    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}
