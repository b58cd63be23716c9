//! Session store error types.

use thiserror::Error;

/// Session store errors
#[derive(Debug, Error)]
pub enum AccountsError {
    /// User id is empty, too long, or contains forbidden characters
    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] narrative_storage::StorageError),
}

/// Result type for session store operations
pub type Result<T> = std::result::Result<T, AccountsError>;
