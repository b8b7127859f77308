//! Backend endpoint paths and authentication bodies.

use serde::{Deserialize, Serialize};

use verigov_core::CredentialPair;
use verigov_core::error::{Error, InvalidInputError};
use verigov_core::models::TargetId;

// ============================================================================
// Paths
// ============================================================================

/// POST /auth/login
pub const LOGIN: &str = "/auth/login";

/// POST /auth/register
pub const REGISTER: &str = "/auth/register";

/// POST /auth/refresh
pub const REFRESH: &str = "/auth/refresh";

/// GET, POST /targets
pub const TARGETS: &str = "/targets";

/// GET /me
pub const ME: &str = "/me";

/// GET /healthz
pub const HEALTH: &str = "/healthz";

/// Endpoints that never enter the refresh-and-retry path.
pub const AUTH_ENDPOINTS: [&str; 3] = [LOGIN, REGISTER, REFRESH];

/// Returns true for the login, register and refresh endpoints.
pub fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS.iter().any(|prefix| path.starts_with(prefix))
}

/// POST /targets/{id}/check
pub fn target_check(id: TargetId) -> String {
    format!("{}/{}/check", TARGETS, id)
}

/// GET /targets/{id}/report/latest
pub fn latest_report(id: TargetId) -> String {
    format!("{}/{}/report/latest", TARGETS, id)
}

/// GET /jobs/{job_id}
pub fn job(job_id: &str) -> Result<String, Error> {
    let reserved = |c: char| matches!(c, '/' | '?' | '#' | '%');
    if job_id.is_empty() || job_id == "." || job_id == ".." || job_id.contains(reserved) {
        return Err(InvalidInputError::Other {
            message: format!("invalid job id '{}'", job_id),
        }
        .into());
    }
    Ok(format!("/jobs/{}", job_id))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for register.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub tenant_name: &'a str,
}

/// Request body for refresh.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from login, register and refresh.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn into_pair(self) -> CredentialPair {
        CredentialPair::new(self.access_token, self.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints_are_detected_by_prefix() {
        assert!(is_auth_endpoint("/auth/login"));
        assert!(is_auth_endpoint("/auth/register"));
        assert!(is_auth_endpoint("/auth/refresh"));
        assert!(is_auth_endpoint("/auth/login?next=/targets"));
        assert!(!is_auth_endpoint("/targets"));
        assert!(!is_auth_endpoint("/me"));
    }

    #[test]
    fn target_paths() {
        assert_eq!(target_check(TargetId(3)), "/targets/3/check");
        assert_eq!(latest_report(TargetId(3)), "/targets/3/report/latest");
    }

    #[test]
    fn job_path_rejects_separators() {
        assert_eq!(job("abc123").unwrap(), "/jobs/abc123");
        assert!(job("../me").is_err());
        assert!(job("").is_err());
        assert!(job("..").is_err());
    }
}
