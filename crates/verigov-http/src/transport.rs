//! HTTP transport for backend requests.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use verigov_core::error::{Error, HttpError, InvalidInputError, TransportError};
use verigov_core::{ApiUrl, Result};

use crate::config::ClientConfig;
use crate::request::RequestDescriptor;

/// Message used when an error response carries no readable body.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Sends requests to the backend and interprets responses.
///
/// Attaches no credentials of its own; that is the pipeline's job.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(transport_error)?;

        Ok(Self {
            client,
            api: config.api_url.clone(),
        })
    }

    /// Returns the backend URL this transport is configured for.
    pub fn api_url(&self) -> &ApiUrl {
        &self.api
    }

    /// Send a descriptor with the given final header set.
    ///
    /// Fails only when no response was obtained; any status is returned.
    #[instrument(skip_all, fields(method = %descriptor.method(), path = descriptor.path()))]
    pub async fn send(
        &self,
        descriptor: &RequestDescriptor,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        let url = self.api.endpoint(descriptor.path());
        trace!(%url, "Sending request");

        let mut request = self
            .client
            .request(descriptor.method().clone(), &url)
            .headers(headers);

        if let Some(body) = descriptor.body() {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                Error::InvalidInput(InvalidInputError::Other {
                    message: format!("request body is not serializable: {}", e),
                })
            })?;
            request = request.body(bytes);
        }

        request.send().await.map_err(transport_error)
    }

    /// POST a JSON body without credentials and decode the response.
    #[instrument(skip(self, body))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("Unauthenticated POST");

        let descriptor = RequestDescriptor::post(path).with_json(body)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self.send(&descriptor, headers).await?;
        handle_response(response).await
    }
}

/// Map a reqwest failure onto the transport taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let transport = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Request { message }
    };
    Error::Transport(transport)
}

/// Decode a 2xx response, or turn any other status into an [`HttpError`].
pub(crate) async fn handle_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    trace!(status = %status, "Response received");

    if status.is_success() {
        let body = response.bytes().await.map_err(transport_error)?;
        decode_body(&body)
    } else {
        Err(Error::Http(parse_error_response(response).await))
    }
}

/// Decode a success body. An empty body decodes as JSON `null`.
pub(crate) fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| Error::Decode {
        message: e.to_string(),
    })
}

/// Build an [`HttpError`] from a non-2xx response.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> HttpError {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let message = match response.bytes().await {
        Ok(body) => error_message(content_type.as_deref(), &body),
        Err(e) => {
            debug!(error = %e, "Error body unreadable");
            GENERIC_FAILURE.to_string()
        }
    };

    HttpError::new(status, message)
}

/// Derive a human-readable message from an error body.
///
/// JSON bodies yield their `detail` string when present, otherwise the
/// serialized JSON. Other bodies yield their text. Empty bodies yield
/// [`GENERIC_FAILURE`].
pub fn error_message(content_type: Option<&str>, body: &[u8]) -> String {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            if let Some(detail) = value.get("detail").and_then(Value::as_str) {
                return detail.to_string();
            }
            if value.is_null() {
                return GENERIC_FAILURE.to_string();
            }
            return value.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    if text.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    #[test]
    fn detail_string_is_preferred() {
        assert_eq!(error_message(JSON, br#"{"detail":"bad input"}"#), "bad input");
    }

    #[test]
    fn json_without_detail_is_stringified() {
        assert_eq!(
            error_message(JSON, br#"{"error":"boom"}"#),
            r#"{"error":"boom"}"#
        );
    }

    #[test]
    fn non_string_detail_is_stringified() {
        let body = br#"{"detail":[{"loc":["body","email"],"msg":"invalid"}]}"#;
        assert_eq!(
            error_message(Some("application/json; charset=utf-8"), body),
            r#"{"detail":[{"loc":["body","email"],"msg":"invalid"}]}"#
        );
    }

    #[test]
    fn text_body_is_used_verbatim() {
        assert_eq!(error_message(Some("text/plain"), b"oops"), "oops");
    }

    #[test]
    fn missing_content_type_uses_text() {
        assert_eq!(error_message(None, b"Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back() {
        assert_eq!(error_message(None, b""), GENERIC_FAILURE);
        assert_eq!(error_message(JSON, b""), GENERIC_FAILURE);
    }

    #[test]
    fn malformed_json_falls_back_to_text() {
        assert_eq!(error_message(JSON, b"{not json"), "{not json");
    }

    #[test]
    fn json_null_falls_back() {
        assert_eq!(error_message(JSON, b"null"), GENERIC_FAILURE);
    }

    #[test]
    fn empty_success_body_decodes_as_null() {
        let value: Option<serde_json::Value> = decode_body(b"").unwrap();
        assert!(value.is_none());
        decode_body::<()>(b"").unwrap();
    }

    #[test]
    fn malformed_success_body_is_decode_error() {
        let err = decode_body::<Vec<u64>>(b"{\"a\":1}").unwrap_err();
        assert_eq!(err.kind(), verigov_core::ErrorKind::Decode);
    }
}
