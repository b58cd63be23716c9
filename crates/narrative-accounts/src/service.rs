//! Session store service implementation.

use crate::{errors::*, traits::*, types::*};
use async_trait::async_trait;
use narrative_storage::{Storage, StoragePool, CF_USERS};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Session store backed by a storage pool
pub struct SessionStoreService<S>
where
    S: Storage,
{
    pool: StoragePool<S>,
}

impl<S> SessionStoreService<S>
where
    S: Storage,
{
    /// Create a new session store service
    pub fn new(pool: StoragePool<S>) -> Self {
        Self { pool }
    }

    /// Read-modify-write a user record under one lease
    async fn upsert_user<F>(&self, user_id: &str, update: F) -> Result<UserRecord>
    where
        F: FnOnce(&mut UserRecord) + Send,
    {
        validate_user_id(user_id)?;

        let storage = self.pool.acquire().await?;
        let key = user_id.to_string();
        let record = storage
            .upsert(CF_USERS, &key, |current: Option<UserRecord>| {
                let now = current_timestamp();
                let mut record = current.unwrap_or_else(|| UserRecord::new(key.clone(), now));
                update(&mut record);
                record.updated_at = now;
                record
            })
            .await?;

        Ok(record)
    }
}

#[async_trait]
impl<S> SessionStore for SessionStoreService<S>
where
    S: Storage,
{
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        validate_user_id(user_id)?;

        let storage = self.pool.acquire().await?;
        let record = storage.get(CF_USERS, &user_id.to_string()).await?;
        Ok(record)
    }

    async fn store_access_token(&self, user_id: &str, access_token: String) -> Result<UserRecord> {
        let record = self
            .upsert_user(user_id, move |record| {
                record.access_token = Some(access_token);
            })
            .await?;

        info!(user_id = %user_id, "Access token stored");
        Ok(record)
    }

    async fn save_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<UserRecord> {
        let record = self
            .upsert_user(user_id, move |record| update.apply(record))
            .await?;

        debug!(user_id = %user_id, "Profile saved");
        Ok(record)
    }

    async fn grant_role(&self, user_id: &str, role: Role) -> Result<UserRecord> {
        let record = self
            .upsert_user(user_id, move |record| record.role = role)
            .await?;

        info!(user_id = %user_id, role = role.as_str(), "Role granted");
        Ok(record)
    }
}
