//! Session store trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;

/// Session store subsystem trait
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a user record by platform user id
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Store (or overwrite) the access token for a user, creating the record if needed
    async fn store_access_token(&self, user_id: &str, access_token: String) -> Result<UserRecord>;

    /// Save narrative preferences, creating the record if needed
    async fn save_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<UserRecord>;

    /// Assign a role to a user, creating the record if needed
    async fn grant_role(&self, user_id: &str, role: Role) -> Result<UserRecord>;
}
