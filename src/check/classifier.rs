//! Classification of an observed certificate against its pin
//!
//! [`classify`] is pure: it decides the outcome from the observed
//! certificate set and the current pin. [`resolve`] then applies the store
//! mutation that belongs to the outcome and builds the [`CheckResult`].
//!
//! | outcome            | status  | store                              |
//! |--------------------|---------|------------------------------------|
//! | malformed input    | ERROR   | untouched                          |
//! | no prior pin       | TOFU    | observed certificate pinned        |
//! | no change          | STORED  | last-seen time refreshed           |
//! | unchecked change   | STORED  | pin replaced by observed           |
//! | checked change     | CHANGED | untouched, old pin stays authority |

use super::comparator::compare_certificates;
use crate::models::{
    CertField, CertificateRecord, Changes, CheckResult, CheckStatus, StoredCertificate,
};
use crate::store::CertificateStore;
use crate::utils::StoreError;
use chrono::{DateTime, Utc};

/// Outcome of comparing an observed certificate set with a host's pin
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The connection did not present exactly one certificate
    MalformedInput { count: usize },
    /// The host has no pin yet
    NoPriorCert { observed: CertificateRecord },
    /// The observed certificate equals the pin
    NoChange { stored: StoredCertificate },
    /// Only fields outside `checked_fields` differ
    UncheckedChange {
        observed: CertificateRecord,
        changes: Changes,
    },
    /// At least one checked field differs
    CheckedChange {
        stored: StoredCertificate,
        observed: CertificateRecord,
        changes: Changes,
    },
}

impl Classification {
    /// Status reported for this outcome
    pub fn status(&self) -> CheckStatus {
        match self {
            Classification::MalformedInput { .. } => CheckStatus::Error,
            Classification::NoPriorCert { .. } => CheckStatus::Tofu,
            Classification::NoChange { .. } | Classification::UncheckedChange { .. } => {
                CheckStatus::Stored
            }
            Classification::CheckedChange { .. } => CheckStatus::Changed,
        }
    }
}

/// Decide the outcome for `certificates` given the host's current pin
pub fn classify(
    certificates: &[CertificateRecord],
    stored: Option<StoredCertificate>,
    checked_fields: &[CertField],
) -> Classification {
    let observed = match certificates {
        [single] => single.clone(),
        _ => {
            return Classification::MalformedInput {
                count: certificates.len(),
            }
        }
    };

    let stored = match stored {
        Some(stored) => stored,
        None => return Classification::NoPriorCert { observed },
    };

    let comparison = compare_certificates(&observed, &stored.record, checked_fields);
    if comparison.is_unchanged() {
        Classification::NoChange { stored }
    } else if comparison.checked_field_changed {
        Classification::CheckedChange {
            stored,
            observed,
            changes: comparison.changes,
        }
    } else {
        Classification::UncheckedChange {
            observed,
            changes: comparison.changes,
        }
    }
}

/// Apply the store mutation for `classification` and build the result
pub fn resolve(
    host: &str,
    classification: Classification,
    store: &dyn CertificateStore,
    now: DateTime<Utc>,
) -> Result<CheckResult, StoreError> {
    let result = match classification {
        Classification::MalformedInput { count } => {
            tracing::debug!("{}: expected one certificate, got {}", host, count);
            CheckResult::error(host)
        }
        Classification::NoPriorCert { observed } => {
            store.put(host, &observed, now)?;
            CheckResult::tofu(host)
        }
        Classification::NoChange { .. } => {
            store.touch_seen(host, now)?;
            CheckResult::stored(host)
        }
        Classification::UncheckedChange { observed, changes } => {
            tracing::debug!(
                "{}: adopting certificate with unchecked changes ({})",
                host,
                field_list(&changes)
            );
            store.put(host, &observed, now)?;
            CheckResult::stored(host)
        }
        Classification::CheckedChange {
            stored,
            observed,
            changes,
        } => CheckResult::changed(host, changes, stored.record, observed),
    };

    Ok(result)
}

fn field_list(changes: &Changes) -> String {
    changes
        .keys()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::fixtures;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn pinned(record: CertificateRecord) -> StoredCertificate {
        StoredCertificate::new(
            "example.com",
            record,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_certificate_count_must_be_one() {
        let record = fixtures::record();
        let stored = Some(pinned(record.clone()));

        let none = classify(&[], stored.clone(), &CertField::ALL);
        assert_eq!(none, Classification::MalformedInput { count: 0 });

        let two = classify(&[record.clone(), record], stored, &CertField::ALL);
        assert_eq!(two, Classification::MalformedInput { count: 2 });
        assert_eq!(two.status(), CheckStatus::Error);
    }

    #[test]
    fn test_first_sighting() {
        let record = fixtures::record();
        let classification = classify(&[record.clone()], None, &CertField::ALL);
        assert_eq!(
            classification,
            Classification::NoPriorCert { observed: record }
        );
        assert_eq!(classification.status(), CheckStatus::Tofu);
    }

    #[test]
    fn test_unchecked_change_status() {
        let stored = fixtures::record();
        let mut observed = stored.clone();
        observed.fingerprint = "00:11".to_string();

        let classification = classify(&[observed], Some(pinned(stored)), &[CertField::Subject]);
        assert!(matches!(
            classification,
            Classification::UncheckedChange { .. }
        ));
        assert_eq!(classification.status(), CheckStatus::Stored);
    }

    #[test]
    fn test_resolve_malformed_leaves_store() {
        let store = MemoryStore::new();
        let result = resolve(
            "example.com",
            Classification::MalformedInput { count: 3 },
            &store,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.status, CheckStatus::Error);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_no_change_refreshes_seen() {
        let record = fixtures::record();
        let earlier = pinned(record.clone());
        let store = MemoryStore::with_entries([earlier.clone()]);
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();

        let classification = classify(&[record.clone()], Some(earlier), &CertField::ALL);
        let result = resolve("example.com", classification, &store, now).unwrap();

        assert_eq!(result.status, CheckStatus::Stored);
        assert!(result.changes.is_empty());
        let stored = store.get("example.com").unwrap().unwrap();
        assert_eq!(stored.record, record);
        assert_eq!(stored.last_seen, now);
    }

    #[test]
    fn test_resolve_checked_change_keeps_pin() {
        let record = fixtures::record();
        let earlier = pinned(record.clone());
        let store = MemoryStore::with_entries([earlier.clone()]);

        let mut observed = record.clone();
        observed.issuer = "CN=Intercepting Proxy CA".to_string();

        let classification = classify(&[observed.clone()], Some(earlier.clone()), &CertField::ALL);
        let result = resolve("example.com", classification, &store, Utc::now()).unwrap();

        assert_eq!(result.status, CheckStatus::Changed);
        assert!(!result.accepted);
        assert_eq!(result.stored.as_ref(), Some(&record));
        assert_eq!(result.got.as_ref(), Some(&observed));
        assert_eq!(store.get("example.com").unwrap().unwrap(), earlier);
    }
}
