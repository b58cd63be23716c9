//! Stripe checkout client.

use crate::config::BillingConfig;
use crate::traits::CheckoutProvider;
use crate::types::*;
use crate::{BillingError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

/// Stripe error body: `{"error": {"message": ...}}`
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Checkout provider backed by the Stripe API
pub struct StripeClient {
    http_client: reqwest::Client,
    config: BillingConfig,
}

impl StripeClient {
    pub fn new(config: BillingConfig, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }
}

impl CheckoutProvider for StripeClient {
    async fn create_checkout_session(&self, user_id: &str, plan: Plan) -> Result<CheckoutSession> {
        let success_url = self.config.success_url(user_id)?;
        let cancel_url = self.config.cancel_url()?;

        let params = [
            ("mode", plan.mode().as_str()),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", self.config.prices.price_for(plan)),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url.as_str()),
            ("cancel_url", cancel_url.as_str()),
            ("client_reference_id", user_id),
        ];

        let response = self
            .http_client
            .post(self.config.checkout_sessions_url())
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            error!(
                user_id = %user_id,
                status = %status,
                "Checkout session creation failed: {}",
                message
            );
            return Err(BillingError::Provider(format!("status {}: {}", status, message)));
        }

        let session: CheckoutSession = response.json().await?;

        info!(
            user_id = %user_id,
            plan = plan.as_str(),
            session_id = %session.id,
            "Checkout session created"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        let config = BillingConfig::new(
            "sk_test_123".to_string(),
            "https://xsummerizer.com".to_string(),
        )
        .with_api_base_url(server.uri());
        StripeClient::new(config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_single_plan_is_one_time_payment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("price%5D=price_1QvkjaEHF0Ss91IDEKoczIOu"))
            .and(body_string_contains("quantity%5D=1"))
            .and(body_string_contains("client_reference_id=u1"))
            .and(body_string_contains(
                "success_url=https%3A%2F%2Fxsummerizer.com%2Fsuccess%3FuserId%3Du1",
            ))
            .and(body_string_contains(
                "cancel_url=https%3A%2F%2Fxsummerizer.com%2Fcreate",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client_for(&server)
            .create_checkout_session("u1", Plan::Single)
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert!(session.url.is_some());
    }

    #[tokio::test]
    async fn test_monthly_plan_is_subscription() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(body_string_contains("mode=subscription"))
            .and(body_string_contains("price%5D=price_1Qvkk0EHF0Ss91IDhWUXeh7E"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cs_test_2" })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client_for(&server)
            .create_checkout_session("u1", Plan::Monthly)
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_2");
        assert_eq!(session.url, None);
    }

    #[tokio::test]
    async fn test_provider_error_message_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "type": "invalid_request_error", "message": "No such price" }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_checkout_session("u1", Plan::Single)
            .await;

        assert!(
            matches!(result, Err(BillingError::Provider(msg)) if msg.contains("No such price"))
        );
    }
}
