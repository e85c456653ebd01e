//! Field-by-field certificate comparison

use crate::models::{CertField, CertificateRecord, Changes, FieldChange};

/// Differences between an observed certificate and its pin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Every differing field, stored and observed values
    pub changes: Changes,
    /// Whether at least one differing field is a checked field
    pub checked_field_changed: bool,
}

impl Comparison {
    /// Whether the certificates are identical in all compared fields
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compare `observed` against the pinned `stored` certificate
///
/// All six fields are compared in priority order regardless of
/// `checked_fields`; only the `checked_field_changed` flag depends on it.
pub fn compare_certificates(
    observed: &CertificateRecord,
    stored: &CertificateRecord,
    checked_fields: &[CertField],
) -> Comparison {
    let mut comparison = Comparison::default();

    for field in CertField::ALL {
        if observed.field_matches(stored, field) {
            continue;
        }

        comparison.changes.insert(
            field,
            FieldChange {
                stored: stored.field(field),
                got: observed.field(field),
            },
        );

        if checked_fields.contains(&field) {
            comparison.checked_field_changed = true;
        }
    }

    comparison
}
