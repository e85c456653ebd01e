//! Data models for cert-watch
//!
//! This module contains the certificate records, check results, and
//! connection events shared by the rest of the crate.

pub mod certificate;
pub mod check_result;
pub mod connection;

pub use certificate::{CertField, CertificateRecord, FieldValue, StoredCertificate, Validity};
pub use check_result::{CheckResult, CheckStatus, Changes, FieldChange};
pub use connection::{ConnectionEvent, SecurityInfo, SecurityState, TabId};
