//! Scoped store access.
//!
//! Every request acquires a [`StorageLease`] before touching the store and
//! releases it when the lease is dropped. The number of outstanding leases is
//! bounded so a burst of requests queues instead of piling onto the database.

use crate::errors::{Result, StorageError};
use std::{ops::Deref, sync::Arc, time::Duration};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{trace, warn};

/// Default number of concurrent leases
pub const DEFAULT_MAX_LEASES: usize = 32;

/// Default time to wait for a lease
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded pool of leases over a shared storage handle
pub struct StoragePool<S> {
    storage: Arc<S>,
    permits: Arc<Semaphore>,
    max_leases: usize,
    acquire_timeout: Duration,
}

impl<S> Clone for StoragePool<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            permits: Arc::clone(&self.permits),
            max_leases: self.max_leases,
            acquire_timeout: self.acquire_timeout,
        }
    }
}

impl<S> StoragePool<S> {
    /// Create a pool with `max_leases` concurrent leases
    pub fn new(storage: Arc<S>, max_leases: usize, acquire_timeout: Duration) -> Self {
        let max_leases = max_leases.max(1);
        Self {
            storage,
            permits: Arc::new(Semaphore::new(max_leases)),
            max_leases,
            acquire_timeout,
        }
    }

    /// Create a pool with default limits
    pub fn with_defaults(storage: Arc<S>) -> Self {
        Self::new(storage, DEFAULT_MAX_LEASES, DEFAULT_ACQUIRE_TIMEOUT)
    }

    /// Acquire a lease, waiting up to the configured timeout
    pub async fn acquire(&self) -> Result<StorageLease<S>> {
        let acquire = Arc::clone(&self.permits).acquire_owned();

        let permit = match tokio::time::timeout(self.acquire_timeout, acquire).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(StorageError::PoolClosed),
            Err(_) => {
                warn!(
                    max_leases = self.max_leases,
                    "Timed out waiting for a storage lease"
                );
                return Err(StorageError::PoolExhausted(
                    self.acquire_timeout.as_millis() as u64,
                ));
            }
        };

        trace!(available = self.permits.available_permits(), "Storage lease acquired");

        Ok(StorageLease {
            storage: Arc::clone(&self.storage),
            _permit: permit,
        })
    }

    /// Number of leases that can be acquired without waiting
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Maximum number of concurrent leases
    pub fn max_leases(&self) -> usize {
        self.max_leases
    }

    /// Stop handing out leases; pending and future `acquire` calls fail
    pub fn close(&self) {
        self.permits.close();
    }
}

/// Scoped access to the store; the lease is returned to the pool on drop
pub struct StorageLease<S> {
    storage: Arc<S>,
    _permit: OwnedSemaphorePermit,
}

impl<S> Deref for StorageLease<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RocksDbStorage, Storage, CF_USERS};

    fn test_pool(
        max_leases: usize,
        timeout_ms: u64,
    ) -> (StoragePool<RocksDbStorage>, tempfile::TempDir) {
        let (storage, temp_dir) = RocksDbStorage::open_temp().unwrap();
        let pool = StoragePool::new(
            Arc::new(storage),
            max_leases,
            Duration::from_millis(timeout_ms),
        );
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_lease_gives_store_access() {
        let (pool, _temp_dir) = test_pool(2, 100);

        let lease = pool.acquire().await.unwrap();
        lease.put(CF_USERS, &"u1", &"value".to_string()).await.unwrap();
        let value: Option<String> = lease.get(CF_USERS, &"u1").await.unwrap();

        assert_eq!(value.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_lease_released_on_drop() {
        let (pool, _temp_dir) = test_pool(2, 100);

        let first = pool.acquire().await.unwrap();
        let second = pool.acquire().await.unwrap();
        assert_eq!(pool.available(), 0);

        drop(first);
        assert_eq!(pool.available(), 1);
        drop(second);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_acquire_times_out_when_exhausted() {
        let (pool, _temp_dir) = test_pool(1, 20);

        let _held = pool.acquire().await.unwrap();
        let result = pool.acquire().await;

        assert!(matches!(result, Err(StorageError::PoolExhausted(20))));
    }

    #[tokio::test]
    async fn test_waiter_gets_lease_after_release() {
        let (pool, _temp_dir) = test_pool(1, 1_000);

        let held = pool.acquire().await.unwrap();
        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(held);

        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_acquire() {
        let (pool, _temp_dir) = test_pool(1, 100);

        pool.close();

        assert!(matches!(pool.acquire().await, Err(StorageError::PoolClosed)));
    }

    #[test]
    fn test_zero_leases_is_clamped() {
        let (storage, _temp_dir) = RocksDbStorage::open_temp().unwrap();
        let pool = StoragePool::with_defaults(Arc::new(storage));
        assert_eq!(pool.max_leases(), DEFAULT_MAX_LEASES);

        let (storage, _temp_dir) = RocksDbStorage::open_temp().unwrap();
        let pool = StoragePool::new(Arc::new(storage), 0, DEFAULT_ACQUIRE_TIMEOUT);
        assert_eq!(pool.max_leases(), 1);
    }
}
