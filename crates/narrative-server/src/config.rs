use anyhow::{Context, Result};
use narrative_billing::{BillingConfig, PriceCatalog, DEFAULT_PRICE_MONTHLY, DEFAULT_PRICE_SINGLE};
use narrative_storage::pool::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_LEASES};
use narrative_x::config::{DEFAULT_API_BASE_URL, DEFAULT_AUTHORIZE_URL};
use narrative_x::XConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Server configuration
#[derive(Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Path to RocksDB database
    pub database_path: PathBuf,

    /// Public URL of the web app
    pub app_url: String,

    /// OAuth redirect URI registered with X
    pub callback_url: String,

    pub x_client_id: String,
    pub x_client_secret: String,
    pub x_api_base_url: String,
    pub x_authorize_url: String,

    pub stripe_secret_key: String,
    pub stripe_api_base_url: String,
    pub stripe_prices: PriceCatalog,

    /// Users granted the admin role at startup
    pub admin_user_ids: Vec<String>,

    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,

    pub store_max_leases: usize,
    pub store_acquire_timeout: Duration,

    /// Timeout for calls to X and Stripe
    pub upstream_timeout: Duration,

    /// Path prefix stripped from serverless invocation paths
    pub function_path_prefix: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).with_context(|| format!("{} environment variable required", name))
        };

        let bind_address = parse_or(&var, "BIND_ADDRESS", "127.0.0.1:5001")?;

        let database_path = var("DATABASE_PATH")
            .unwrap_or_else(|| "./data/narrative.db".to_string())
            .into();

        let app_url = var("APP_URL")
            .unwrap_or_else(|| "https://xsummerizer.com".to_string())
            .trim_end_matches('/')
            .to_string();
        Url::parse(&app_url).with_context(|| format!("APP_URL is not a valid URL: {}", app_url))?;

        let callback_url = var("CALLBACK_URL")
            .unwrap_or_else(|| format!("{}/api/auth/callback", app_url));

        let store_acquire_timeout = Duration::from_millis(parse_or(
            &var,
            "STORE_ACQUIRE_TIMEOUT_MS",
            &DEFAULT_ACQUIRE_TIMEOUT.as_millis().to_string(),
        )?);

        let upstream_timeout = Duration::from_secs(parse_or(&var, "UPSTREAM_TIMEOUT_SECS", "30")?);

        Ok(Config {
            bind_address,
            database_path,
            app_url,
            callback_url,
            x_client_id: required("X_CLIENT_ID")?,
            x_client_secret: required("X_CLIENT_SECRET")?,
            x_api_base_url: var("X_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            x_authorize_url: var("X_AUTHORIZE_URL")
                .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            stripe_api_base_url: var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|| narrative_billing::config::DEFAULT_API_BASE_URL.to_string()),
            stripe_prices: PriceCatalog {
                single: var("STRIPE_PRICE_SINGLE")
                    .unwrap_or_else(|| DEFAULT_PRICE_SINGLE.to_string()),
                monthly: var("STRIPE_PRICE_MONTHLY")
                    .unwrap_or_else(|| DEFAULT_PRICE_MONTHLY.to_string()),
            },
            admin_user_ids: split_list(var("ADMIN_USER_IDS")),
            allowed_origins: split_list(var("ALLOWED_ORIGINS")),
            store_max_leases: parse_or(&var, "STORE_MAX_LEASES", &DEFAULT_MAX_LEASES.to_string())?,
            store_acquire_timeout,
            upstream_timeout,
            function_path_prefix: var("FUNCTION_PATH_PREFIX")
                .unwrap_or_else(|| "/api".to_string()),
        })
    }

    pub fn x_config(&self) -> XConfig {
        XConfig::new(
            self.x_client_id.clone(),
            self.x_client_secret.clone(),
            self.callback_url.clone(),
        )
        .with_api_base_url(self.x_api_base_url.clone())
        .with_authorize_url(self.x_authorize_url.clone())
    }

    pub fn billing_config(&self) -> BillingConfig {
        BillingConfig::new(self.stripe_secret_key.clone(), self.app_url.clone())
            .with_api_base_url(self.stripe_api_base_url.clone())
            .with_prices(self.stripe_prices.clone())
    }

    /// `{app_url}/?userId={user_id}`, where the app lands after login
    pub fn post_login_url(&self, user_id: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}/", self.app_url))?;
        url.query_pairs_mut().append_pair("userId", user_id);
        Ok(url.to_string())
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    let raw = var(name).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{} has an invalid value: {}", name, raw))
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_path", &self.database_path)
            .field("app_url", &self.app_url)
            .field("callback_url", &self.callback_url)
            .field("x_client_id", &self.x_client_id)
            .field("x_client_secret", &"<redacted>")
            .field("x_api_base_url", &self.x_api_base_url)
            .field("stripe_secret_key", &"<redacted>")
            .field("stripe_api_base_url", &self.stripe_api_base_url)
            .field("admin_user_ids", &self.admin_user_ids)
            .field("allowed_origins", &self.allowed_origins)
            .field("store_max_leases", &self.store_max_leases)
            .field("function_path_prefix", &self.function_path_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut vars: HashMap<String, String> = [
            ("X_CLIENT_ID", "client"),
            ("X_CLIENT_SECRET", "x-secret"),
            ("STRIPE_SECRET_KEY", "sk_test"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            vars.insert(k.to_string(), v.to_string());
        }
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:5001");
        assert_eq!(config.database_path, PathBuf::from("./data/narrative.db"));
        assert_eq!(config.app_url, "https://xsummerizer.com");
        assert_eq!(config.callback_url, "https://xsummerizer.com/api/auth/callback");
        assert_eq!(config.x_api_base_url, "https://api.twitter.com");
        assert_eq!(config.stripe_prices, PriceCatalog::default());
        assert!(config.admin_user_ids.is_empty());
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.store_max_leases, 32);
        assert_eq!(config.store_acquire_timeout, Duration::from_millis(5000));
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.function_path_prefix, "/api");
    }

    #[test]
    fn test_missing_required_variable() {
        let vars = lookup(&[]);
        let result = Config::from_lookup(|name| {
            if name == "STRIPE_SECRET_KEY" {
                None
            } else {
                vars(name)
            }
        });

        let err = result.unwrap_err().to_string();
        assert!(err.contains("STRIPE_SECRET_KEY"));
    }

    #[test]
    fn test_lists_and_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ADMIN_USER_IDS", "14554287, 42,,"),
            ("ALLOWED_ORIGINS", "https://xsummerizer.com"),
            ("APP_URL", "http://localhost:3000/"),
            ("STORE_MAX_LEASES", "4"),
        ]))
        .unwrap();

        assert_eq!(config.admin_user_ids, vec!["14554287", "42"]);
        assert_eq!(config.allowed_origins, vec!["https://xsummerizer.com"]);
        assert_eq!(config.app_url, "http://localhost:3000");
        assert_eq!(config.callback_url, "http://localhost:3000/api/auth/callback");
        assert_eq!(config.store_max_leases, 4);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = Config::from_lookup(lookup(&[("UPSTREAM_TIMEOUT_SECS", "soon")]));
        assert!(result.unwrap_err().to_string().contains("UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_post_login_url() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.post_login_url("14554287").unwrap(),
            "https://xsummerizer.com/?userId=14554287"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", Config::from_lookup(lookup(&[])).unwrap());
        assert!(!debug.contains("x-secret"));
        assert!(!debug.contains("sk_test"));
    }
}
