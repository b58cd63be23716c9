use anyhow::Result;
use narrative_accounts::{Role, SessionStore, SessionStoreService};
use narrative_billing::StripeClient;
use narrative_storage::{RocksDbStorage, StoragePool};
use narrative_x::{AuthExchangeService, ContentService, XClient};
use std::sync::Arc;

use crate::config::Config;

pub type Sessions = SessionStoreService<RocksDbStorage>;
pub type AuthExchange = AuthExchangeService<XClient, Sessions, RocksDbStorage>;
pub type Content = ContentService<XClient, Sessions>;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub pool: StoragePool<RocksDbStorage>,
    pub sessions: Arc<Sessions>,
    pub auth_service: AuthExchange,
    pub content_service: Content,
    pub checkout: StripeClient,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize storage
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let storage = Arc::new(RocksDbStorage::open(&config.database_path)?);

        let state = Self::with_storage(config, storage)?;
        state.seed_admins().await?;
        Ok(state)
    }

    /// Wire services over an already opened store
    pub fn with_storage(config: Config, storage: Arc<RocksDbStorage>) -> Result<Self> {
        let pool = StoragePool::new(
            storage,
            config.store_max_leases,
            config.store_acquire_timeout,
        );

        let sessions = Arc::new(SessionStoreService::new(pool.clone()));
        let x_client = Arc::new(XClient::with_timeout(config.x_config(), config.upstream_timeout)?);

        let auth_service =
            AuthExchangeService::new(x_client.clone(), sessions.clone(), pool.clone());
        let content_service = ContentService::new(x_client, sessions.clone());
        let checkout = StripeClient::new(config.billing_config(), config.upstream_timeout)?;

        Ok(AppState {
            config,
            pool,
            sessions,
            auth_service,
            content_service,
            checkout,
        })
    }

    /// Grant the admin role to every configured admin id
    pub async fn seed_admins(&self) -> Result<()> {
        for user_id in &self.config.admin_user_ids {
            self.sessions.grant_role(user_id, Role::Admin).await?;
            tracing::info!(user_id = %user_id, "Admin role granted");
        }
        Ok(())
    }
}
