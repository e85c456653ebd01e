//! JSON file backed certificate store
//!
//! The whole store is one JSON object keyed by host. It is read once on
//! open and rewritten after every mutation, via a temporary file that is
//! renamed into place.

use super::CertificateStore;
use crate::models::{CertificateRecord, StoredCertificate};
use crate::utils::StoreError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

type Entries = BTreeMap<String, StoredCertificate>;

/// Certificate store persisted as a JSON file
///
/// Mutations write the file with blocking `std::fs` calls on the calling
/// thread, so inside the monitor they run on a runtime worker while the
/// host lock is held. A failed write leaves the in-memory entries as they
/// were before the call.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| StoreError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            if content.trim().is_empty() {
                Entries::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
        } else {
            Entries::new()
        };

        tracing::debug!("Opened certificate store {} ({} hosts)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        let write_failed = |message: String| StoreError::WriteFailed {
            path: self.path.display().to_string(),
            message,
        };

        let json = serde_json::to_string_pretty(entries).map_err(|e| write_failed(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| write_failed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_failed(e.to_string()))
    }
}

impl CertificateStore for JsonFileStore {
    fn get(&self, host: &str) -> Result<Option<StoredCertificate>, StoreError> {
        Ok(self.lock()?.get(host).cloned())
    }

    fn put(
        &self,
        host: &str,
        record: &CertificateRecord,
        seen_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let previous = entries.insert(
            host.to_string(),
            StoredCertificate::new(host, record.clone(), seen_at),
        );

        if let Err(e) = self.persist(&entries) {
            // keep memory and disk in step
            match previous {
                Some(previous) => entries.insert(host.to_string(), previous),
                None => entries.remove(host),
            };
            return Err(e);
        }
        Ok(())
    }

    fn touch_seen(&self, host: &str, seen_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let stored = entries.get_mut(host).ok_or_else(|| StoreError::NotFound {
            host: host.to_string(),
        })?;
        let previous = std::mem::replace(&mut stored.last_seen, seen_at);

        if let Err(e) = self.persist(&entries) {
            if let Some(stored) = entries.get_mut(host) {
                stored.last_seen = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, host: &str) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        match entries.remove(host) {
            Some(previous) => {
                if let Err(e) = self.persist(&entries) {
                    entries.insert(host.to_string(), previous);
                    return Err(e);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self) -> Result<Vec<StoredCertificate>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}
