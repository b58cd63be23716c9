//! OAuth 2.0 authorization-code login.

use super::state_hash_for_log;
use crate::{errors::*, pkce, traits::XApi, types::*};
use narrative_accounts::{service::current_timestamp, validate_user_id, SessionStore};
use narrative_storage::{Storage, StoragePool, CF_OAUTH_STATES};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Starts logins and turns callback codes into stored sessions
pub struct AuthExchangeService<A, U, S>
where
    A: XApi,
    U: SessionStore,
    S: Storage,
{
    api: Arc<A>,
    sessions: Arc<U>,
    pool: StoragePool<S>,
    state_ttl: u64,
}

impl<A, U, S> AuthExchangeService<A, U, S>
where
    A: XApi,
    U: SessionStore,
    S: Storage,
{
    /// Create a new auth exchange service
    pub fn new(api: Arc<A>, sessions: Arc<U>, pool: StoragePool<S>) -> Self {
        Self {
            api,
            sessions,
            pool,
            state_ttl: PENDING_AUTHORIZATION_TTL,
        }
    }

    /// Override how long a started login stays valid, in seconds
    pub fn with_state_ttl(mut self, state_ttl: u64) -> Self {
        self.state_ttl = state_ttl;
        self
    }

    /// Start a login.
    ///
    /// Generates a fresh `state` and PKCE verifier, stores them as a pending
    /// authorization, and returns the provider URL to redirect the browser to.
    pub async fn begin_login(&self) -> Result<AuthorizationRequest> {
        let state = pkce::generate_state();
        let pair = pkce::PkcePair::generate();
        let now = current_timestamp();

        let pending = PendingAuthorization {
            state: state.clone(),
            code_verifier: pair.verifier,
            created_at: now,
            expires_at: now + self.state_ttl,
        };

        let authorize_url = self.api.authorize_url(&state, &pair.challenge)?;

        let storage = self.pool.acquire().await?;
        match storage
            .purge(CF_OAUTH_STATES, PENDING_SWEEP_LIMIT, |p: &PendingAuthorization| {
                p.is_expired(now)
            })
            .await
        {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Reclaimed expired OAuth states"),
            Err(e) => warn!("Failed to reclaim expired OAuth states: {}", e),
        }
        storage.put(CF_OAUTH_STATES, &state, &pending).await?;

        info!(state_hash = %state_hash_for_log(&state), "OAuth login initiated");

        Ok(AuthorizationRequest {
            authorize_url,
            state,
        })
    }

    /// Complete a login.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the provider redirect
    /// * `state` - State from the same redirect; consumed on first use
    ///
    /// # Returns
    ///
    /// The platform user id, after its token has been stored
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<String> {
        if code.is_empty() {
            return Err(XError::UpstreamAuth("Missing authorization code".to_string()));
        }

        // Step 1: Verify and consume state
        let pending = self.consume_pending(state).await?;

        // Step 2: Exchange authorization code for a bearer token
        let token = self.api.exchange_code(code, &pending.code_verifier).await?;

        // Step 3: Resolve the user that owns the token
        let user = self.api.current_user(&token.access_token).await?;
        validate_user_id(&user.id).map_err(|_| {
            XError::UpstreamAuth(format!("Provider returned invalid user id {:?}", user.id))
        })?;

        // Step 4: Upsert the session
        self.sessions
            .store_access_token(&user.id, token.access_token)
            .await?;

        info!(user_id = %user.id, "OAuth login completed");
        Ok(user.id)
    }

    /// Drop a pending authorization the provider reported as declined
    ///
    /// Unknown or empty states are ignored.
    pub async fn discard(&self, state: &str) -> Result<()> {
        if state.is_empty() {
            return Ok(());
        }

        let storage = self.pool.acquire().await?;
        let removed: Option<PendingAuthorization> =
            storage.take(CF_OAUTH_STATES, &state.to_string()).await?;
        if removed.is_some() {
            info!(state_hash = %state_hash_for_log(state), "OAuth login abandoned");
        }
        Ok(())
    }

    async fn consume_pending(&self, state: &str) -> Result<PendingAuthorization> {
        if state.is_empty() {
            warn!("OAuth callback without state");
            return Err(XError::AuthorizationStateInvalid);
        }

        let storage = self.pool.acquire().await?;
        let pending: PendingAuthorization = storage
            .take(CF_OAUTH_STATES, &state.to_string())
            .await?
            .ok_or_else(|| {
                warn!(
                    state_hash = %state_hash_for_log(state),
                    "OAuth state unknown or already used"
                );
                XError::AuthorizationStateInvalid
            })?;

        if pending.is_expired(current_timestamp()) {
            warn!(state_hash = %state_hash_for_log(state), "OAuth state expired");
            return Err(XError::AuthorizationStateInvalid);
        }

        Ok(pending)
    }
}
