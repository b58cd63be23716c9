//! Storage error types.

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Invalid column family
    #[error("Invalid column family: {0}")]
    InvalidColumnFamily(String),

    /// No lease became available before the acquire timeout
    #[error("Storage pool exhausted after {0} ms")]
    PoolExhausted(u64),

    /// The pool was closed while waiting for a lease
    #[error("Storage pool closed")]
    PoolClosed,

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
