//! Certificate handling module
//!
//! This module provides functionality for:
//! - Reading PEM and DER certificate data
//! - Reducing a certificate to the fields used for pinning

pub mod reader;
pub mod record;

pub use reader::{certificates_from_bytes, read_certificates, DetectedFormat};
pub use record::record_from_der;

use crate::models::CertificateRecord;
use crate::utils::CertificateError;
use std::path::Path;

/// Read every certificate in a file as a pinning record
pub fn load_records(path: &Path) -> Result<Vec<CertificateRecord>, CertificateError> {
    read_certificates(path)?
        .iter()
        .map(|der| record_from_der(der))
        .collect()
}
