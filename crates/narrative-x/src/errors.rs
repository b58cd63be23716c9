//! X integration error types.

use thiserror::Error;

/// X integration errors
#[derive(Debug, Error)]
pub enum XError {
    /// The identity provider rejected the code or the identity lookup failed
    #[error("Upstream auth error: {0}")]
    UpstreamAuth(String),

    /// OAuth state not found, expired, or already used
    #[error("Authorization state invalid")]
    AuthorizationStateInvalid,

    /// No usable token for the user
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// The platform API call failed (rate limit, revoked token, invalid count)
    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    /// OAuth configuration invalid
    #[error("OAuth configuration invalid: {0}")]
    ConfigInvalid(String),

    /// Session store error
    #[error("Session store error: {0}")]
    Accounts(#[from] narrative_accounts::AccountsError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] narrative_storage::StorageError),
}

/// Result type for X integration operations
pub type Result<T> = std::result::Result<T, XError>;
