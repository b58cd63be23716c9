//! X integration type definitions.

use serde::{Deserialize, Serialize};

/// Lifetime of a pending authorization in seconds
pub const PENDING_AUTHORIZATION_TTL: u64 = 600;

/// Most expired pending authorizations reclaimed per started login
pub const PENDING_SWEEP_LIMIT: usize = 64;

/// Token response from the provider
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Token type (typically "bearer")
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token expiry time in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes, space separated
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Authenticated platform user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct XUser {
    /// Platform user id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Handle
    #[serde(default)]
    pub username: Option<String>,
}

/// A post relayed from the platform; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post id
    pub id: String,
    /// Post text
    pub text: String,
}

/// `{"data": ...}` wrapper used by the v2 API
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: Option<T>,
}

/// Login in progress, keyed by `state`
#[derive(Clone, Serialize, Deserialize)]
pub struct PendingAuthorization {
    /// OAuth state sent to the provider
    pub state: String,
    /// PKCE verifier presented at code exchange
    pub code_verifier: String,
    /// Unix timestamp when the login started
    pub created_at: u64,
    /// Unix timestamp after which the state is rejected
    pub expires_at: u64,
}

impl PendingAuthorization {
    /// Whether the authorization is past its expiry at `now`
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at < now
    }
}

/// Where to send the browser to start a login
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Provider authorize URL including state and PKCE challenge
    pub authorize_url: String,
    /// OAuth state bound to this login
    pub state: String,
}
