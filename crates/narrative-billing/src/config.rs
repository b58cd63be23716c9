//! Checkout provider configuration.

use crate::{errors::*, types::PriceCatalog};
use url::Url;

/// Default Stripe API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Billing configuration
#[derive(Clone)]
pub struct BillingConfig {
    /// Provider secret key, sent as a bearer credential
    pub secret_key: String,
    /// Provider API base URL
    pub api_base_url: String,
    /// Price ids per plan
    pub prices: PriceCatalog,
    /// Public URL of the web app the browser returns to
    pub app_url: String,
}

impl BillingConfig {
    /// Create a configuration with the default API base and prices
    pub fn new(secret_key: String, app_url: String) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            prices: PriceCatalog::default(),
            app_url,
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: String) -> Self {
        self.api_base_url = api_base_url;
        self
    }

    pub fn with_prices(mut self, prices: PriceCatalog) -> Self {
        self.prices = prices;
        self
    }

    pub fn checkout_sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base_url.trim_end_matches('/'))
    }

    /// `{app_url}/success?userId={user_id}`
    pub fn success_url(&self, user_id: &str) -> Result<String> {
        let mut url = self.app_page("success")?;
        url.query_pairs_mut().append_pair("userId", user_id);
        Ok(url.to_string())
    }

    /// `{app_url}/create`
    pub fn cancel_url(&self) -> Result<String> {
        Ok(self.app_page("create")?.to_string())
    }

    fn app_page(&self, page: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.app_url.trim_end_matches('/'), page);
        Url::parse(&raw).map_err(|e| BillingError::ConfigInvalid(format!("Invalid app URL: {}", e)))
    }
}

impl std::fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("prices", &self.prices)
            .field("app_url", &self.app_url)
            .finish()
    }
}
