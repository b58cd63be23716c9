//! X OAuth and API configuration.

/// Default authorize endpoint
pub const DEFAULT_AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";

/// Default API base (token, users/me, timelines)
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";

/// X client configuration
#[derive(Clone)]
pub struct XConfig {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Authorization endpoint
    pub authorize_url: String,
    /// API base URL; token and resource paths are appended to it
    pub api_base_url: String,
    /// Scopes to request
    pub scopes: Vec<String>,
}

impl XConfig {
    /// Create a configuration pointing at the public X endpoints
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            scopes: vec!["tweet.read".to_string(), "users.read".to_string()],
        }
    }

    /// Point every API call at `api_base_url`
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Override the authorize endpoint
    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }

    /// OAuth 2.0 user token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/2/oauth2/token", self.api_base())
    }

    /// Application-only (client credentials) token endpoint
    pub fn app_token_url(&self) -> String {
        format!("{}/oauth2/token", self.api_base())
    }

    /// Authenticated user endpoint
    pub fn current_user_url(&self) -> String {
        format!("{}/2/users/me", self.api_base())
    }

    /// Timeline endpoint for `user_id`
    pub fn user_posts_url(&self, user_id: &str) -> String {
        format!("{}/2/users/{}/tweets", self.api_base(), user_id)
    }

    fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for XConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("authorize_url", &self.authorize_url)
            .field("api_base_url", &self.api_base_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}
