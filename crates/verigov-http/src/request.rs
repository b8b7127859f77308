//! Request descriptors.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use verigov_core::Result;
use verigov_core::error::{Error, InvalidInputError};

use crate::endpoints::is_auth_endpoint;

/// Describes one backend call.
///
/// Built once and then only read; a retry re-sends the same descriptor.
///
/// # Example
///
/// ```
/// use verigov_http::RequestDescriptor;
///
/// let request = RequestDescriptor::post("/targets")
///     .with_json(&serde_json::json!({"document": "12345678000190", "type": "CNPJ"}))
///     .unwrap();
/// assert_eq!(request.path(), "/targets");
/// assert!(request.body().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a caller-supplied header. Caller headers take precedence over
    /// the ones the pipeline would add.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from strings, validating both parts.
    pub fn try_with_header(self, name: &str, value: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(self.with_header(header_name, header_value))
    }

    /// Attach a JSON body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("request body is not serializable: {}", e),
            })
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns true if this call targets login, register or refresh.
    pub fn is_auth_endpoint(&self) -> bool {
        is_auth_endpoint(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    #[test]
    fn defaults_to_no_body_and_no_headers() {
        let request = RequestDescriptor::get("/targets");
        assert_eq!(request.method(), &Method::GET);
        assert!(request.body().is_none());
        assert!(request.headers().is_empty());
        assert!(!request.is_auth_endpoint());
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let request = RequestDescriptor::post("/targets")
            .try_with_header("Content-Type", "application/vnd.verigov+json")
            .unwrap();
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/vnd.verigov+json"
        );
    }

    #[test]
    fn rejects_invalid_header_value() {
        let err = RequestDescriptor::get("/me")
            .try_with_header("x-note", "line\nbreak")
            .unwrap_err();
        assert_eq!(err.kind(), verigov_core::ErrorKind::InvalidInput);
    }

    #[test]
    fn auth_paths_are_flagged() {
        assert!(RequestDescriptor::post("/auth/refresh").is_auth_endpoint());
    }
}
