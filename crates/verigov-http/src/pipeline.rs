//! The authenticated request pipeline.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use verigov_core::error::{AuthError, Error, InvalidInputError};
use verigov_core::{AccessToken, Result, SessionEvent, SessionEventBus, TokenStore};

use crate::refresh::RefreshCoordinator;
use crate::request::RequestDescriptor;
use crate::transport::{HttpTransport, handle_response};

/// The single gateway for backend calls.
///
/// Every call gets the stored access token as a bearer credential. A 401
/// on a call outside the authentication endpoints triggers one renewal
/// and, if it succeeds, one retry. If renewal fails the store is cleared,
/// [`SessionEvent::Expired`] is published and the call fails with
/// [`AuthError::SessionExpired`].
///
/// Cheap to clone; clones share the store, the event bus and the renewal
/// lock.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: HttpTransport,
    store: Arc<dyn TokenStore>,
    refresher: Arc<RefreshCoordinator>,
    events: SessionEventBus,
}

impl RequestPipeline {
    pub fn new(
        transport: HttpTransport,
        store: Arc<dyn TokenStore>,
        events: SessionEventBus,
    ) -> Self {
        let refresher = Arc::new(RefreshCoordinator::new(transport.clone(), store.clone()));
        Self {
            transport,
            store,
            refresher,
            events,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn events(&self) -> &SessionEventBus {
        &self.events
    }

    pub fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Issue a call, renewing the session once on a 401.
    pub async fn issue<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
        self.issue_with(descriptor, true).await
    }

    /// Issue a call. With `allow_retry` false a 401 is returned as a plain
    /// HTTP error.
    #[instrument(skip_all, fields(method = %descriptor.method(), path = descriptor.path()))]
    pub async fn issue_with<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        allow_retry: bool,
    ) -> Result<T> {
        let (response, sent_with) = self.send(descriptor).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && allow_retry
            && !descriptor.is_auth_endpoint()
        {
            debug!("Received 401, attempting session renewal");

            if self.refresher.refresh_after(sent_with.as_ref()).await {
                debug!("Retrying with renewed session");
                let (retry, _) = self.send(descriptor).await?;
                return handle_response(retry).await;
            }

            self.expire_session();
            return Err(AuthError::SessionExpired.into());
        }

        handle_response(response).await
    }

    /// Build headers and send. Returns the response and the access token
    /// the pipeline attached, if any.
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<(reqwest::Response, Option<AccessToken>)> {
        let (headers, sent_with) = self.outgoing_headers(descriptor)?;
        let response = self.transport.send(descriptor, headers).await?;
        debug!(status = %response.status(), "Request completed");
        Ok((response, sent_with))
    }

    fn outgoing_headers(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<(HeaderMap, Option<AccessToken>)> {
        let mut headers = descriptor.headers().clone();
        let mut sent_with = None;

        if !headers.contains_key(AUTHORIZATION)
            && let Some(token) = self.store.access_token()
        {
            let mut value = HeaderValue::from_str(&token.bearer()).map_err(|e| {
                Error::InvalidInput(InvalidInputError::Header {
                    name: AUTHORIZATION.as_str().to_string(),
                    reason: e.to_string(),
                })
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            sent_with = Some(token);
        }

        if descriptor.body().is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok((headers, sent_with))
    }

    fn expire_session(&self) {
        info!("Session expired");

        if let Err(e) = self.store.clear_tokens() {
            warn!(error = %e, "Failed to clear expired session");
        }

        self.events.publish(SessionEvent::Expired);
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("api", &self.transport.api_url())
            .field("tokens", &"[REDACTED]")
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use verigov_core::{ApiUrl, CredentialPair, MemoryTokenStore};

    fn pipeline(store: MemoryTokenStore) -> RequestPipeline {
        let config = ClientConfig::new(ApiUrl::new("http://localhost:8000").unwrap());
        let transport = HttpTransport::new(&config).unwrap();
        RequestPipeline::new(transport, Arc::new(store), SessionEventBus::new())
    }

    #[test]
    fn attaches_bearer_token_when_present() {
        let pipeline = pipeline(MemoryTokenStore::with_tokens(CredentialPair::new("abc", "r")));
        let (headers, sent) = pipeline
            .outgoing_headers(&RequestDescriptor::get("/targets"))
            .unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(sent.unwrap().as_str(), "abc");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn no_authorization_without_token() {
        let pipeline = pipeline(MemoryTokenStore::new());
        let (headers, sent) = pipeline
            .outgoing_headers(&RequestDescriptor::get("/targets"))
            .unwrap();

        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(sent.is_none());
    }

    #[test]
    fn caller_authorization_is_not_overridden() {
        let pipeline = pipeline(MemoryTokenStore::with_tokens(CredentialPair::new("abc", "r")));
        let descriptor = RequestDescriptor::get("/me")
            .try_with_header("Authorization", "Bearer caller")
            .unwrap();
        let (headers, sent) = pipeline.outgoing_headers(&descriptor).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer caller");
        assert!(sent.is_none());
    }

    #[test]
    fn json_content_type_only_with_body() {
        let pipeline = pipeline(MemoryTokenStore::new());
        let descriptor = RequestDescriptor::post("/targets")
            .with_json(&serde_json::json!({"document": "1"}))
            .unwrap();
        let (headers, _) = pipeline.outgoing_headers(&descriptor).unwrap();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn caller_content_type_is_kept() {
        let pipeline = pipeline(MemoryTokenStore::new());
        let descriptor = RequestDescriptor::post("/targets")
            .try_with_header("content-type", "application/merge-patch+json")
            .unwrap()
            .with_json(&serde_json::json!({}))
            .unwrap();
        let (headers, _) = pipeline.outgoing_headers(&descriptor).unwrap();

        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/merge-patch+json"
        );
    }
}
