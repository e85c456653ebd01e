//! Reduction of X.509 certificates to pinning records

use crate::models::{CertificateRecord, Validity};
use crate::utils::CertificateError;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

/// Build a [`CertificateRecord`] from a DER-encoded certificate
pub fn record_from_der(der: &[u8]) -> Result<CertificateRecord, CertificateError> {
    let (_, cert) = X509Certificate::from_der(der).map_err(|e| CertificateError::ParseError {
        message: format!("{:?}", e),
    })?;

    let start = asn1_time_to_datetime(cert.validity().not_before)?;
    let end = asn1_time_to_datetime(cert.validity().not_after)?;

    Ok(CertificateRecord {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        validity: Validity::new(start, end),
        subject_public_key_info_digest: spki_digest(cert.public_key().raw),
        serial_number: colon_hex(cert.raw_serial()),
        fingerprint: colon_hex(&Sha256::digest(der)),
    })
}

/// Base64 SHA-256 digest of a DER SubjectPublicKeyInfo
pub fn spki_digest(spki: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(spki))
}

/// Upper-case hex bytes separated by colons
pub fn colon_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
        .chars()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    let timestamp = time.timestamp();
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| CertificateError::InvalidTime {
            message: format!("timestamp {} out of range", timestamp),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_hex() {
        assert_eq!(colon_hex(&[0x0a, 0xff, 0x00]), "0A:FF:00");
        assert_eq!(colon_hex(&[0x03, 0xe9]), "03:E9");
        assert_eq!(colon_hex(&[]), "");
    }

    #[test]
    fn test_spki_digest_of_empty_input() {
        // SHA-256 of the empty string
        assert_eq!(spki_digest(b""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            record_from_der(b"not a certificate"),
            Err(CertificateError::ParseError { .. })
        ));
    }
}
