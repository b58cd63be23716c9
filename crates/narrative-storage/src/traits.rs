//! Storage trait definitions.

use crate::errors::{Result, StorageError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Storage interface for key-value operations
///
/// This trait abstracts the underlying storage implementation (RocksDB)
/// to enable testing with other implementations.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get a value by key from a column family
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` if key exists, `Ok(None)` if not found
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned;

    /// Put a key-value pair into a column family
    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync;

    /// Delete a key from a column family
    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync;

    /// Check if a key exists in a column family
    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync;

    /// Insert or update a value atomically
    ///
    /// `update` receives the current value (if any) and returns the value to
    /// store. No other `upsert` or `take` can interleave between the read and
    /// the write. Returns the stored value.
    async fn upsert<K, V, F>(&self, cf: &str, key: &K, update: F) -> Result<V>
    where
        K: Serialize + Send + Sync,
        V: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(Option<V>) -> V + Send;

    /// Remove and return a value atomically
    ///
    /// At most one caller observes `Some` for a given stored value.
    async fn take<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned + Send;

    /// Delete up to `limit` entries of a column family matching `stale`
    ///
    /// Values that no longer deserialize as `V` are deleted too. Returns the
    /// number of entries removed.
    async fn purge<V, F>(&self, cf: &str, limit: usize, stale: F) -> Result<usize>
    where
        V: DeserializeOwned + Send,
        F: Fn(&V) -> bool + Send + Sync;
}

/// Helper function to serialize a key
pub(crate) fn serialize_key<K: Serialize>(key: &K) -> Result<Vec<u8>> {
    bincode::serialize(key).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Helper function to serialize a value
pub(crate) fn serialize_value<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Helper function to deserialize a value
pub(crate) fn deserialize_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Deserialization(e.to_string()))
}
