//! Per-host serialization of pin updates

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held while a host's pin is read, classified and written
pub type HostGuard = OwnedMutexGuard<()>;

/// Registry of one async mutex per host
///
/// Entries are held weakly, a host's mutex lives only as long as some
/// evaluation holds or waits for it.
#[derive(Debug, Default)]
pub struct HostLocks {
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl HostLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `host`
    pub async fn acquire(&self, host: &str) -> HostGuard {
        self.mutex_for(host).lock_owned().await
    }

    fn mutex_for(&self, host: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(existing) = locks.get(host).and_then(Weak::upgrade) {
            return existing;
        }

        locks.retain(|_, lock| lock.strong_count() > 0);
        let mutex = Arc::new(AsyncMutex::new(()));
        locks.insert(host.to_string(), Arc::downgrade(&mutex));
        mutex
    }

    /// Number of hosts with a live lock
    #[cfg(test)]
    fn active(&self) -> usize {
        match self.locks.lock() {
            Ok(locks) => locks.values().filter(|l| l.strong_count() > 0).count(),
            Err(poisoned) => poisoned
                .into_inner()
                .values()
                .filter(|l| l.strong_count() > 0)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_host_is_exclusive() {
        let locks = HostLocks::new();
        let guard = locks.acquire("example.com").await;

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("example.com")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("example.com")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_hosts_do_not_block() {
        let locks = HostLocks::new();
        let _a = locks.acquire("a.example.com").await;

        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("b.example.com")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_dropped() {
        let locks = HostLocks::new();
        {
            let _guard = locks.acquire("example.com").await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }
}
