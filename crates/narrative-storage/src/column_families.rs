//! RocksDB column family definitions.

/// User records: user_id → UserRecord
pub const CF_USERS: &str = "users";

/// Pending OAuth authorizations: state → PendingAuthorization (TTL: 10 min)
pub const CF_OAUTH_STATES: &str = "oauth_states";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![CF_USERS, CF_OAUTH_STATES]
}
