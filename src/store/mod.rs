//! Pinned certificate storage
//!
//! A store keeps at most one [`StoredCertificate`] per host. Evaluations of
//! the same host serialize their read-classify-write sequence through
//! [`HostLocks`].

pub mod file;
pub mod locks;
pub mod memory;

pub use file::JsonFileStore;
pub use locks::HostLocks;
pub use memory::MemoryStore;

use crate::models::{CertificateRecord, StoredCertificate};
use crate::utils::StoreError;
use chrono::{DateTime, Utc};

/// Durable mapping of host to its pinned certificate
pub trait CertificateStore: Send + Sync {
    /// Pinned certificate for `host`, if any
    fn get(&self, host: &str) -> Result<Option<StoredCertificate>, StoreError>;

    /// Pin `record` for `host`, replacing any previous pin
    fn put(
        &self,
        host: &str,
        record: &CertificateRecord,
        seen_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Refresh the last-seen time of the pin for `host`
    fn touch_seen(&self, host: &str, seen_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Forget the pin for `host`, returning whether one existed
    fn remove(&self, host: &str) -> Result<bool, StoreError>;

    /// All pinned certificates ordered by host
    fn list(&self) -> Result<Vec<StoredCertificate>, StoreError>;
}
