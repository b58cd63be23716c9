//! Post relay backed by stored sessions.

use crate::{errors::*, traits::XApi, types::Post};
use narrative_accounts::{Capability, SessionStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Relays a user's recent posts using their stored session
pub struct ContentService<A, U>
where
    A: XApi,
    U: SessionStore,
{
    api: Arc<A>,
    sessions: Arc<U>,
}

impl<A, U> ContentService<A, U>
where
    A: XApi,
    U: SessionStore,
{
    /// Create a new content service
    pub fn new(api: Arc<A>, sessions: Arc<U>) -> Self {
        Self { api, sessions }
    }

    /// Fetch up to `count` recent posts for `user_id`.
    ///
    /// Uses the user's stored token. Users whose role grants
    /// [`Capability::AppTokenFetch`] fall back to an application token when
    /// they have none. Posts are returned in platform order and not stored.
    pub async fn fetch_content(&self, user_id: &str, count: u32) -> Result<Vec<Post>> {
        let token = self.resolve_token(user_id).await?;

        let posts = self.api.user_posts(&token, user_id, count).await?;

        info!(user_id = %user_id, requested = count, returned = posts.len(), "Posts fetched");
        Ok(posts)
    }

    async fn resolve_token(&self, user_id: &str) -> Result<String> {
        let record = self
            .sessions
            .get_user(user_id)
            .await?
            .ok_or_else(|| XError::Unauthenticated(user_id.to_string()))?;

        if record.has_access_token() {
            if let Some(token) = record.access_token {
                return Ok(token);
            }
        }

        if record.can(Capability::AppTokenFetch) {
            debug!(user_id = %user_id, role = record.role.as_str(), "Using application token");
            let token = self.api.app_token().await?;
            return Ok(token.access_token);
        }

        Err(XError::Unauthenticated(user_id.to_string()))
    }
}
