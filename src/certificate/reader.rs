//! Certificate file reading and format detection
//!
//! Auto-detects PEM and DER input and returns the DER encoding of every
//! certificate found.

use crate::utils::CertificateError;
use std::path::Path;
use x509_parser::prelude::*;

/// Detected certificate file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    Pem,
    Der,
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedFormat::Pem => write!(f, "PEM"),
            DetectedFormat::Der => write!(f, "DER"),
        }
    }
}

/// Detect format from raw bytes
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DetectedFormat, CertificateError> {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.contains("-----BEGIN ") {
            return Ok(DetectedFormat::Pem);
        }
    }

    if X509Certificate::from_der(data).is_ok() {
        return Ok(DetectedFormat::Der);
    }

    Err(CertificateError::UnsupportedFormat {
        format: "unknown (could not detect PEM or DER)".to_string(),
    })
}

/// Read certificates from a file, returning DER-encoded certificate bytes
///
/// A PEM file may hold any number of certificates, including none.
pub fn read_certificates(path: &Path) -> Result<Vec<Vec<u8>>, CertificateError> {
    let data = std::fs::read(path).map_err(|e| CertificateError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    certificates_from_bytes(&data)
}

/// Extract DER-encoded certificates from PEM or DER bytes
pub fn certificates_from_bytes(data: &[u8]) -> Result<Vec<Vec<u8>>, CertificateError> {
    match detect_format_from_bytes(data)? {
        DetectedFormat::Pem => {
            let pems = ::pem::parse_many(data).map_err(|e| CertificateError::ParseError {
                message: format!("Failed to parse PEM: {}", e),
            })?;

            Ok(pems
                .into_iter()
                .filter(|p| p.tag() == "CERTIFICATE")
                .map(|p| p.into_contents())
                .collect())
        }
        DetectedFormat::Der => Ok(vec![data.to_vec()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pem_format() {
        let pem_data =
            b"-----BEGIN CERTIFICATE-----\nMIIBkTCB+wIJAL...\n-----END CERTIFICATE-----\n";
        assert_eq!(
            detect_format_from_bytes(pem_data).unwrap(),
            DetectedFormat::Pem
        );
    }

    #[test]
    fn test_detect_unknown_format() {
        let garbage = b"this is not a certificate";
        assert!(detect_format_from_bytes(garbage).is_err());
    }

    #[test]
    fn test_pem_without_certificates() {
        let key_only = b"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        assert!(certificates_from_bytes(key_only).unwrap().is_empty());
    }
}
