//! X platform trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;

/// Calls made against the X platform
///
/// Implemented by [`crate::XClient`]; services are generic over it so tests
/// can substitute a scripted platform.
#[async_trait]
pub trait XApi: Send + Sync {
    /// Build the authorize URL for `state` and the S256 `code_challenge`
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String>;

    /// Exchange an authorization code for a user bearer token
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenResponse>;

    /// Obtain an application-only token through the client-credentials grant
    async fn app_token(&self) -> Result<TokenResponse>;

    /// Resolve the user that owns `access_token`
    async fn current_user(&self, access_token: &str) -> Result<XUser>;

    /// Fetch up to `count` of `user_id`'s most recent posts
    async fn user_posts(&self, access_token: &str, user_id: &str, count: u32) -> Result<Vec<Post>>;
}
