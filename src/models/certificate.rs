//! Certificate records tracked per host
//!
//! A [`CertificateRecord`] holds only the fields that matter for pinning
//! decisions. It is built from the leaf certificate of a connection and
//! persisted as a [`StoredCertificate`] once a host has been seen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Security-relevant certificate field
///
/// Variants are declared in priority order; the derived `Ord` is used to
/// present changes with the most important field first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CertField {
    #[serde(rename = "subject")]
    Subject,
    #[serde(rename = "issuer")]
    Issuer,
    #[serde(rename = "validity")]
    Validity,
    #[serde(rename = "subjectPublicKeyInfoDigest")]
    SubjectPublicKeyInfoDigest,
    #[serde(rename = "serialNumber")]
    SerialNumber,
    #[serde(rename = "fingerprint")]
    Fingerprint,
}

impl CertField {
    /// All fields in priority order
    pub const ALL: [CertField; 6] = [
        CertField::Subject,
        CertField::Issuer,
        CertField::Validity,
        CertField::SubjectPublicKeyInfoDigest,
        CertField::SerialNumber,
        CertField::Fingerprint,
    ];

    /// Name used in settings files and serialized results
    pub fn as_str(&self) -> &'static str {
        match self {
            CertField::Subject => "subject",
            CertField::Issuer => "issuer",
            CertField::Validity => "validity",
            CertField::SubjectPublicKeyInfoDigest => "subjectPublicKeyInfoDigest",
            CertField::SerialNumber => "serialNumber",
            CertField::Fingerprint => "fingerprint",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CertField::Subject => "Subject",
            CertField::Issuer => "Issuer",
            CertField::Validity => "Validity",
            CertField::SubjectPublicKeyInfoDigest => "SPKI digest",
            CertField::SerialNumber => "Serial number",
            CertField::Fingerprint => "Fingerprint",
        }
    }
}

impl fmt::Display for CertField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CertField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CertField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown certificate field '{}'", s))
    }
}

/// Validity window of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Validity {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.end.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Normalized snapshot of one certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Validity window
    pub validity: Validity,
    /// Base64 SHA-256 digest of the SubjectPublicKeyInfo
    pub subject_public_key_info_digest: String,
    /// Serial number as colon-separated hex
    pub serial_number: String,
    /// SHA-256 fingerprint of the DER encoding
    pub fingerprint: String,
}

/// Rendered value of one field, used when reporting changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Validity(Validity),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Validity(validity) => write!(f, "{}", validity),
        }
    }
}

impl CertificateRecord {
    /// Value of a single field
    pub fn field(&self, field: CertField) -> FieldValue {
        match field {
            CertField::Subject => FieldValue::Text(self.subject.clone()),
            CertField::Issuer => FieldValue::Text(self.issuer.clone()),
            CertField::Validity => FieldValue::Validity(self.validity),
            CertField::SubjectPublicKeyInfoDigest => {
                FieldValue::Text(self.subject_public_key_info_digest.clone())
            }
            CertField::SerialNumber => FieldValue::Text(self.serial_number.clone()),
            CertField::Fingerprint => FieldValue::Text(self.fingerprint.clone()),
        }
    }

    /// Whether a single field is equal between two records
    pub fn field_matches(&self, other: &CertificateRecord, field: CertField) -> bool {
        match field {
            CertField::Subject => self.subject == other.subject,
            CertField::Issuer => self.issuer == other.issuer,
            CertField::Validity => {
                self.validity.start == other.validity.start
                    && self.validity.end == other.validity.end
            }
            CertField::SubjectPublicKeyInfoDigest => {
                self.subject_public_key_info_digest == other.subject_public_key_info_digest
            }
            CertField::SerialNumber => self.serial_number == other.serial_number,
            CertField::Fingerprint => self.fingerprint == other.fingerprint,
        }
    }
}

/// Pinned certificate for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCertificate {
    pub host: String,
    pub record: CertificateRecord,
    pub last_seen: DateTime<Utc>,
}

impl StoredCertificate {
    pub fn new(host: impl Into<String>, record: CertificateRecord, last_seen: DateTime<Utc>) -> Self {
        Self {
            host: host.into(),
            record,
            last_seen,
        }
    }
}
