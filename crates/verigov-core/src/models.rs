//! Wire models for the VeriGov backend.
//!
//! Decoding is lenient about optional fields; the backend owns their
//! semantics and the client does not interpret them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target document type accepted by the backend.
pub const DOCUMENT_TYPE_CNPJ: &str = "CNPJ";

/// Backend identifier of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TargetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for TargetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A company record identified by its national tax document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for creating a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTarget {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NewTarget {
    /// A CNPJ target. The backend normalises the document.
    pub fn cnpj(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            name_hint: None,
            kind: DOCUMENT_TYPE_CNPJ.to_string(),
        }
    }

    pub fn with_name_hint(mut self, name_hint: impl Into<String>) -> Self {
        self.name_hint = Some(name_hint.into());
        self
    }
}

/// Response of a run-check call.
///
/// The body is implementation-defined; a synchronous run reports
/// `status: "ok"` with a `summary`, a queued run reports
/// `status: "queued"` with a `job_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

impl CheckOutcome {
    /// Returns true if the backend queued the check instead of running it.
    pub fn is_queued(&self) -> bool {
        self.job_id.is_some() || self.status.as_deref() == Some("queued")
    }
}

/// The most recent report for a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary_json: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub tenant_id: u64,
    pub email: String,
    pub role: String,
}

/// State of a queued check job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Backend liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_target_omits_absent_name_hint() {
        let body = serde_json::to_value(NewTarget::cnpj("12345678000190")).unwrap();
        assert_eq!(body, json!({"document": "12345678000190", "type": "CNPJ"}));
    }

    #[test]
    fn new_target_with_name_hint() {
        let body =
            serde_json::to_value(NewTarget::cnpj("12345678000190").with_name_hint("Acme")).unwrap();
        assert_eq!(body["name_hint"], "Acme");
        assert_eq!(body["type"], "CNPJ");
    }

    #[test]
    fn target_tolerates_missing_optional_fields() {
        let target: Target =
            serde_json::from_value(json!({"id": 7, "document": "12345678000190"})).unwrap();
        assert_eq!(target.id, TargetId(7));
        assert!(target.name_hint.is_none());
        assert!(target.created_at.is_none());
    }

    #[test]
    fn target_decodes_full_backend_shape() {
        let target: Target = serde_json::from_value(json!({
            "id": 1,
            "tenant_id": 2,
            "document": "12345678000190",
            "name_hint": null,
            "type": "CNPJ",
            "created_at": "2025-03-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(target.kind.as_deref(), Some("CNPJ"));
        assert_eq!(target.tenant_id, Some(2));
    }

    #[test]
    fn check_outcome_queued_and_sync() {
        let queued: CheckOutcome =
            serde_json::from_value(json!({"status": "queued", "job_id": "abc"})).unwrap();
        assert!(queued.is_queued());

        let done: CheckOutcome =
            serde_json::from_value(json!({"status": "ok", "summary": {"status": "ATIVA"}}))
                .unwrap();
        assert!(!done.is_queued());
        assert_eq!(done.summary.unwrap()["status"], "ATIVA");
    }

    #[test]
    fn target_id_parses_from_str() {
        assert_eq!("42".parse::<TargetId>().unwrap(), TargetId(42));
        assert!("abc".parse::<TargetId>().is_err());
    }
}
