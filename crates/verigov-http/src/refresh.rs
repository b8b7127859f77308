//! Session renewal.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use verigov_core::{AccessToken, TokenStore};

use crate::endpoints::{REFRESH, RefreshRequest, TokenResponse};
use crate::transport::HttpTransport;

/// Exchanges the stored refresh token for a new credential pair.
///
/// The coordinator only ever writes a pair it received from the backend.
/// Clearing the store and announcing expiry after a failed renewal is left
/// to the caller.
///
/// Renewals are serialised: concurrent callers wait for the exchange in
/// progress, and a caller that passes the access token its request was sent
/// with skips the exchange if a peer has already replaced that token.
pub struct RefreshCoordinator {
    transport: HttpTransport,
    store: Arc<dyn TokenStore>,
    in_flight: Mutex<()>,
}

impl RefreshCoordinator {
    pub fn new(transport: HttpTransport, store: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            store,
            in_flight: Mutex::new(()),
        }
    }

    /// Renew the session. Returns `true` if a new pair was stored and
    /// `false` if the session cannot be recovered.
    pub async fn refresh(&self) -> bool {
        self.refresh_after(None).await
    }

    /// Renew the session after a request sent with `stale` was rejected.
    ///
    /// If the store already holds a different access token once the
    /// renewal lock is acquired, a concurrent caller renewed the session and
    /// no exchange is made.
    #[instrument(skip_all)]
    pub async fn refresh_after(&self, stale: Option<&AccessToken>) -> bool {
        let _guard = self.in_flight.lock().await;

        if let (Some(stale), Some(current)) = (stale, self.store.access_token())
            && &current != stale
        {
            debug!("Session already renewed by a concurrent request");
            return true;
        }

        self.exchange().await
    }

    async fn exchange(&self) -> bool {
        let Some(refresh_token) = self.store.refresh_token() else {
            debug!("No refresh token stored");
            return false;
        };

        info!("Refreshing session");

        let request = RefreshRequest {
            refresh_token: refresh_token.as_str(),
        };

        let response: TokenResponse = match self.transport.post_json(REFRESH, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Session renewal failed");
                return false;
            }
        };

        let pair = response.into_pair();
        if pair.access_token.is_empty() {
            warn!("Session renewal returned an empty access token");
            return false;
        }

        if let Err(e) = self.store.set_tokens(pair) {
            warn!(error = %e, "Failed to store renewed session");
            return false;
        }

        debug!("Session refreshed successfully");
        true
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("api", &self.transport.api_url())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
