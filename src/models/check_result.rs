//! Outcome of evaluating one connection

use super::certificate::{CertField, CertificateRecord, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Status of a certificate check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// First certificate seen for the host, now pinned
    Tofu,
    /// Certificate matches the pin, or only unchecked fields drifted
    Stored,
    /// A checked field differs from the pinned certificate
    Changed,
    /// The connection could not be evaluated
    Error,
}

impl CheckStatus {
    /// Get the icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Tofu => "★",
            CheckStatus::Stored => "✓",
            CheckStatus::Changed => "⚠",
            CheckStatus::Error => "✗",
        }
    }

    /// Get the color name for this status
    pub fn color_name(&self) -> &'static str {
        match self {
            CheckStatus::Tofu => "blue",
            CheckStatus::Stored => "green",
            CheckStatus::Changed => "red",
            CheckStatus::Error => "magenta",
        }
    }

    /// Precedence when several results share one indicator
    pub fn severity(&self) -> u8 {
        match self {
            CheckStatus::Stored => 0,
            CheckStatus::Tofu => 1,
            CheckStatus::Error => 2,
            CheckStatus::Changed => 3,
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Tofu => write!(f, "TOFU"),
            CheckStatus::Stored => write!(f, "STORED"),
            CheckStatus::Changed => write!(f, "CHANGED"),
            CheckStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// A single field that differs from the pinned certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub stored: FieldValue,
    pub got: FieldValue,
}

/// Changed fields keyed in priority order
pub type Changes = BTreeMap<CertField, FieldChange>;

/// Result of one connection evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Host of the connection, empty if it could not be recovered
    pub host: String,
    pub status: CheckStatus,
    /// Differing fields, only populated for `Changed`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub changes: Changes,
    /// Whether the user accepted a changed certificate
    #[serde(default)]
    pub accepted: bool,
    /// Pinned certificate at the time of a `Changed` result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored: Option<CertificateRecord>,
    /// Observed certificate of a `Changed` result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub got: Option<CertificateRecord>,
}

impl CheckResult {
    fn with_status(host: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            host: host.into(),
            status,
            changes: Changes::new(),
            accepted: false,
            stored: None,
            got: None,
        }
    }

    /// Create a first-use result
    pub fn tofu(host: impl Into<String>) -> Self {
        Self::with_status(host, CheckStatus::Tofu)
    }

    /// Create a result for a certificate matching its pin
    pub fn stored(host: impl Into<String>) -> Self {
        Self::with_status(host, CheckStatus::Stored)
    }

    /// Create an error result
    pub fn error(host: impl Into<String>) -> Self {
        Self::with_status(host, CheckStatus::Error)
    }

    /// Create a result for a certificate that changed in a checked field
    pub fn changed(
        host: impl Into<String>,
        changes: Changes,
        stored: CertificateRecord,
        got: CertificateRecord,
    ) -> Self {
        Self {
            host: host.into(),
            status: CheckStatus::Changed,
            changes,
            accepted: false,
            stored: Some(stored),
            got: Some(got),
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        match self.status {
            CheckStatus::Tofu => format!("{}: first certificate pinned", self.host),
            CheckStatus::Stored => format!("{}: certificate matches pin", self.host),
            CheckStatus::Changed => {
                let fields: Vec<&str> = self.changes.keys().map(|f| f.as_str()).collect();
                format!("{}: certificate changed ({})", self.host, fields.join(", "))
            }
            CheckStatus::Error => {
                if self.host.is_empty() {
                    "connection could not be checked".to_string()
                } else {
                    format!("{}: connection could not be checked", self.host)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::fixtures;

    #[test]
    fn test_status_display() {
        assert_eq!(CheckStatus::Tofu.to_string(), "TOFU");
        assert_eq!(CheckStatus::Stored.to_string(), "STORED");
        assert_eq!(CheckStatus::Changed.to_string(), "CHANGED");
        assert_eq!(CheckStatus::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_error_icon_differs_from_changed() {
        assert_ne!(CheckStatus::Error.icon(), CheckStatus::Changed.icon());
        assert_ne!(CheckStatus::Error.icon(), CheckStatus::Stored.icon());
        assert!(CheckStatus::Changed.severity() > CheckStatus::Error.severity());
    }

    #[test]
    fn test_changed_result_summary() {
        let stored = fixtures::record();
        let mut got = stored.clone();
        got.issuer = "CN=Other CA".to_string();

        let mut changes = Changes::new();
        changes.insert(
            CertField::Issuer,
            FieldChange {
                stored: stored.field(CertField::Issuer),
                got: got.field(CertField::Issuer),
            },
        );

        let result = CheckResult::changed("example.com", changes, stored, got);
        assert!(!result.accepted);
        assert_eq!(
            result.summary(),
            "example.com: certificate changed (issuer)"
        );
    }

    #[test]
    fn test_result_json_omits_empty_changes() {
        let json = serde_json::to_string(&CheckResult::tofu("example.com")).unwrap();
        assert!(json.contains("\"TOFU\""));
        assert!(!json.contains("changes"));
    }
}
