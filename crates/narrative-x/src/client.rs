//! HTTP client for the X OAuth and v2 APIs.

use crate::config::XConfig;
use crate::errors::*;
use crate::pkce::CHALLENGE_METHOD;
use crate::traits::XApi;
use crate::types::{DataEnvelope, Post, TokenResponse, XUser};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default timeout for calls to the platform
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// X client for provider interactions
pub struct XClient {
    http_client: Client,
    config: XConfig,
}

impl XClient {
    /// Create a new client with the default timeout
    pub fn new(config: XConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a request timeout
    pub fn with_timeout(config: XConfig, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| XError::ConfigInvalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &XConfig {
        &self.config
    }

    async fn request_token(&self, url: &str, params: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.http_client
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(params)
            .send()
            .await
    }
}

/// Turn a non-2xx response into a message carrying status and body
async fn error_message(context: &str, response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{} failed with status {}: {}", context, status, body)
}

#[async_trait]
impl XApi for XClient {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| XError::ConfigInvalid(format!("Invalid authorize URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", CHALLENGE_METHOD);

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenResponse> {
        let params = [
            ("code", code),
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .request_token(&self.config.token_url(), &params)
            .await
            .map_err(|e| XError::UpstreamAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let message = error_message("Token exchange", response).await;
            warn!("{}", message);
            return Err(XError::UpstreamAuth(message));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            XError::UpstreamAuth(format!("Failed to parse token response: {}", e))
        })?;

        debug!(expires_in = ?token.expires_in, "Authorization code exchanged");
        Ok(token)
    }

    async fn app_token(&self) -> Result<TokenResponse> {
        let params = [("grant_type", "client_credentials")];

        let response = self
            .request_token(&self.config.app_token_url(), &params)
            .await
            .map_err(|e| XError::UpstreamFetch(format!("App token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(XError::UpstreamFetch(
                error_message("App token request", response).await,
            ));
        }

        response.json().await.map_err(|e| {
            XError::UpstreamFetch(format!("Failed to parse app token response: {}", e))
        })
    }

    async fn current_user(&self, access_token: &str) -> Result<XUser> {
        let response = self
            .http_client
            .get(self.config.current_user_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| XError::UpstreamAuth(format!("User lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(XError::UpstreamAuth(
                error_message("User lookup", response).await,
            ));
        }

        let envelope: DataEnvelope<XUser> = response
            .json()
            .await
            .map_err(|e| XError::UpstreamAuth(format!("Failed to parse user: {}", e)))?;

        envelope
            .data
            .ok_or_else(|| XError::UpstreamAuth("Missing user in response".to_string()))
    }

    async fn user_posts(&self, access_token: &str, user_id: &str, count: u32) -> Result<Vec<Post>> {
        let response = self
            .http_client
            .get(self.config.user_posts_url(user_id))
            .query(&[("max_results", count)])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| XError::UpstreamFetch(format!("Post fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(XError::UpstreamFetch(
                error_message("Post fetch", response).await,
            ));
        }

        let envelope: DataEnvelope<Vec<Post>> = response
            .json()
            .await
            .map_err(|e| XError::UpstreamFetch(format!("Failed to parse posts: {}", e)))?;

        Ok(envelope.data.unwrap_or_default())
    }
}
