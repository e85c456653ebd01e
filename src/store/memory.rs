//! In-memory certificate store

use super::CertificateStore;
use crate::models::{CertificateRecord, StoredCertificate};
use crate::utils::StoreError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Certificate store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoredCertificate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given pins
    pub fn with_entries(entries: impl IntoIterator<Item = StoredCertificate>) -> Self {
        let entries = entries
            .into_iter()
            .map(|stored| (stored.host.clone(), stored))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredCertificate>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl CertificateStore for MemoryStore {
    fn get(&self, host: &str) -> Result<Option<StoredCertificate>, StoreError> {
        Ok(self.lock()?.get(host).cloned())
    }

    fn put(
        &self,
        host: &str,
        record: &CertificateRecord,
        seen_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.lock()?.insert(
            host.to_string(),
            StoredCertificate::new(host, record.clone(), seen_at),
        );
        Ok(())
    }

    fn touch_seen(&self, host: &str, seen_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let stored = entries.get_mut(host).ok_or_else(|| StoreError::NotFound {
            host: host.to_string(),
        })?;
        stored.last_seen = seen_at;
        Ok(())
    }

    fn remove(&self, host: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(host).is_some())
    }

    fn list(&self) -> Result<Vec<StoredCertificate>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::fixtures;
    use chrono::TimeZone;

    #[test]
    fn test_put_replaces_existing_pin() {
        let store = MemoryStore::new();
        let first = fixtures::record();
        let mut second = first.clone();
        second.serial_number = "ff:ee".to_string();

        store.put("example.com", &first, Utc::now()).unwrap();
        store.put("example.com", &second, Utc::now()).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.get("example.com").unwrap().unwrap().record, second);
    }

    #[test]
    fn test_touch_seen_keeps_record() {
        let store = MemoryStore::new();
        let record = fixtures::record();
        let earlier = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();

        store.put("example.com", &record, earlier).unwrap();
        store.touch_seen("example.com", later).unwrap();

        let stored = store.get("example.com").unwrap().unwrap();
        assert_eq!(stored.record, record);
        assert_eq!(stored.last_seen, later);
    }

    #[test]
    fn test_touch_seen_unknown_host() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.touch_seen("example.com", Utc::now()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.put("example.com", &fixtures::record(), Utc::now()).unwrap();

        assert!(store.remove("example.com").unwrap());
        assert!(!store.remove("example.com").unwrap());
        assert!(store.get("example.com").unwrap().is_none());
    }
}
