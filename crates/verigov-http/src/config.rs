//! Client configuration.

use std::time::Duration;

use verigov_core::ApiUrl;

/// Backend URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for a [`VerigovClient`](crate::VerigovClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend.
    pub api_url: ApiUrl,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Whole-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            user_agent: concat!("verigov/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new(ApiUrl::new(DEFAULT_API_URL).unwrap());
        assert!(config.user_agent.starts_with("verigov/"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new(ApiUrl::new(DEFAULT_API_URL).unwrap())
            .with_user_agent("dashboard/2")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.user_agent, "dashboard/2");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
