//! RocksDB storage implementation.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{deserialize_value, serialize_key, serialize_value, Storage},
};
use async_trait::async_trait;
use rocksdb::{Options, WriteBatch, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// RocksDB storage implementation
pub struct RocksDbStorage {
    db: Arc<DB>,
    /// Serializes writers so read-modify-write operations stay atomic.
    write_lock: Mutex<()>,
}

impl RocksDbStorage {
    /// Open RocksDB database at the specified path
    ///
    /// Creates all required column families if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, &path, all_column_families())
            .map_err(|e| StorageError::Database(e.to_string()))?;

        debug!("Opened RocksDB at {:?}", path.as_ref());

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Open a database in a fresh temporary directory
    ///
    /// The directory lives as long as the returned `TempDir`. This is public
    /// for use in other crates' test modules.
    pub fn open_temp() -> Result<(Self, tempfile::TempDir)> {
        let temp_dir = tempfile::TempDir::new().map_err(StorageError::IoError)?;
        let storage = Self::open(temp_dir.path())?;
        Ok((storage, temp_dir))
    }

    /// Get column family handle
    fn cf_handle(&self, cf: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(cf)
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
    }

    fn read_raw(&self, cf: &str, key_bytes: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf_handle = self.cf_handle(cf)?;
        self.db
            .get_cf(cf_handle, key_bytes)
            .map_err(|e| StorageError::Database(e.to_string()))
    }
}

#[async_trait]
impl Storage for RocksDbStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let key_bytes = serialize_key(key)?;

        match self.read_raw(cf, &key_bytes)? {
            Some(bytes) => Ok(Some(deserialize_value(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;
        let value_bytes = serialize_value(value)?;

        let _guard = self.write_lock.lock().await;
        self.db
            .put_cf(cf_handle, &key_bytes, &value_bytes)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;

        let _guard = self.write_lock.lock().await;
        self.db
            .delete_cf(cf_handle, &key_bytes)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        Ok(self.read_raw(cf, &key_bytes)?.is_some())
    }

    async fn upsert<K, V, F>(&self, cf: &str, key: &K, update: F) -> Result<V>
    where
        K: Serialize + Send + Sync,
        V: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(Option<V>) -> V + Send,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;

        let _guard = self.write_lock.lock().await;

        let current = match self.read_raw(cf, &key_bytes)? {
            Some(bytes) => Some(deserialize_value(&bytes)?),
            None => None,
        };
        let updated = update(current);
        let value_bytes = serialize_value(&updated)?;

        self.db
            .put_cf(cf_handle, &key_bytes, &value_bytes)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(updated)
    }

    async fn take<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned + Send,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;

        let _guard = self.write_lock.lock().await;

        let Some(bytes) = self.read_raw(cf, &key_bytes)? else {
            return Ok(None);
        };

        self.db
            .delete_cf(cf_handle, &key_bytes)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(Some(deserialize_value(&bytes)?))
    }

    async fn purge<V, F>(&self, cf: &str, limit: usize, stale: F) -> Result<usize>
    where
        V: DeserializeOwned + Send,
        F: Fn(&V) -> bool + Send + Sync,
    {
        let cf_handle = self.cf_handle(cf)?;

        let _guard = self.write_lock.lock().await;

        let mut doomed = Vec::new();
        let iter = self.db.iterator_cf(cf_handle, rocksdb::IteratorMode::Start);
        for item in iter {
            if doomed.len() >= limit {
                break;
            }
            let (key, value) = item.map_err(|e| StorageError::Database(e.to_string()))?;
            match deserialize_value::<V>(&value) {
                Ok(value) if !stale(&value) => {}
                Ok(_) => doomed.push(key),
                Err(e) => {
                    warn!(cf = cf, "Purging undecodable entry: {}", e);
                    doomed.push(key);
                }
            }
        }

        let mut batch = WriteBatch::default();
        for key in &doomed {
            batch.delete_cf(cf_handle, key);
        }
        self.db
            .write(batch)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        if !doomed.is_empty() {
            debug!(cf = cf, removed = doomed.len(), "Purged stale entries");
        }
        Ok(doomed.len())
    }
}
