//! Serverless invocation entry point.
//!
//! Translates a JSON invocation envelope into a request for the same router
//! the HTTP server uses, and the router's response back into an envelope.

use axum::{
    body::{to_bytes, Body},
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use url::form_urlencoded;

use crate::{
    routes::{create_router, not_found, resolve},
    state::AppState,
};

/// Inbound invocation envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Outbound invocation envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Dispatches invocation envelopes through the route table
pub struct FunctionDispatcher {
    router: Router,
    path_prefix: String,
}

impl FunctionDispatcher {
    pub fn new(state: Arc<AppState>) -> Self {
        let path_prefix = state.config.function_path_prefix.trim_end_matches('/').to_string();
        Self {
            router: create_router(state),
            path_prefix,
        }
    }

    /// Handle one invocation
    pub async fn handle(&self, event: InvocationEvent) -> InvocationResponse {
        let path = self.strip_prefix(&event.path).to_string();

        let method = Method::from_bytes(event.http_method.to_ascii_uppercase().as_bytes()).ok();
        let route = method.as_ref().and_then(|m| resolve(m, &path));

        let response = match (method, route) {
            (Some(method), Some(route)) => {
                tracing::debug!(?route, path = %path, "Dispatching invocation");
                match build_request(method, &path, &event) {
                    Ok(request) => match self.router.clone().oneshot(request).await {
                        Ok(response) => response,
                        Err(never) => match never {},
                    },
                    Err(message) => {
                        tracing::warn!(path = %path, "Malformed invocation: {}", message);
                        (StatusCode::BAD_REQUEST, message).into_response()
                    }
                }
            }
            _ => {
                tracing::debug!(
                    method = %event.http_method,
                    path = %event.path,
                    "No route for invocation"
                );
                not_found().await.into_response()
            }
        };

        into_envelope(response).await
    }

    fn strip_prefix<'a>(&self, path: &'a str) -> &'a str {
        if self.path_prefix.is_empty() {
            return path;
        }
        match path.strip_prefix(self.path_prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

fn build_request(
    method: Method,
    path: &str,
    event: &InvocationEvent,
) -> Result<Request<Body>, String> {
    let mut uri = path.to_string();
    if let Some(params) = event.query_string_parameters.as_ref().filter(|p| !p.is_empty()) {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        uri.push('?');
        uri.push_str(&query);
    }

    let body = match &event.body {
        Some(body) if event.is_base64_encoded => BASE64
            .decode(body)
            .map_err(|e| format!("Invalid base64 body: {}", e))?,
        Some(body) => body.clone().into_bytes(),
        None => Vec::new(),
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .map_err(|e| format!("Invalid request: {}", e))?;

    for (name, value) in event.headers.iter().flatten() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                request.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid invocation header"),
        }
    }

    Ok(request)
}

async fn into_envelope(response: Response) -> InvocationResponse {
    let status_code = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let body = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::error!("Failed to read response body: {}", e);
            return InvocationResponse {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                headers: HashMap::new(),
                body: String::new(),
            };
        }
    };

    InvocationResponse {
        status_code,
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use narrative_accounts::SessionStore;
    use serde_json::json;

    fn event(value: serde_json::Value) -> InvocationEvent {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state);

        let response = dispatcher
            .handle(event(json!({ "path": "/api/unknown", "httpMethod": "GET" })))
            .await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, "Not found");
    }

    #[tokio::test]
    async fn test_wrong_method_not_found() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state);

        let response = dispatcher
            .handle(event(json!({ "path": "/api/save-profile", "httpMethod": "GET" })))
            .await;

        assert_eq!(response.status_code, 404);
    }

    #[tokio::test]
    async fn test_save_profile_through_envelope() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state.clone());

        let response = dispatcher
            .handle(event(json!({
                "path": "/api/save-profile",
                "httpMethod": "POST",
                "headers": { "content-type": "application/json" },
                "body": json!({ "userId": "u1", "tone": "Witty" }).to_string()
            })))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "Profile saved!");
        assert!(response.headers.contains_key("x-request-id"));

        let record = state.sessions.get_user("u1").await.unwrap().unwrap();
        assert_eq!(record.tone.as_deref(), Some("Witty"));
    }

    #[tokio::test]
    async fn test_base64_body() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state.clone());

        let body = BASE64.encode(json!({ "userId": "u2", "length": "Short" }).to_string());
        let response = dispatcher
            .handle(event(json!({
                "path": "/api/save-profile",
                "httpMethod": "POST",
                "headers": { "content-type": "application/json" },
                "body": body,
                "isBase64Encoded": true
            })))
            .await;

        assert_eq!(response.status_code, 200);
        let record = state.sessions.get_user("u2").await.unwrap().unwrap();
        assert_eq!(record.length.as_deref(), Some("Short"));
    }

    #[tokio::test]
    async fn test_login_redirect_and_query_forwarding() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state);

        let login = dispatcher
            .handle(event(json!({ "path": "/api/login", "httpMethod": "get" })))
            .await;
        assert_eq!(login.status_code, 302);
        assert!(login.headers["location"].starts_with("https://twitter.com/i/oauth2/authorize?"));

        let callback = dispatcher
            .handle(event(json!({
                "path": "/api/auth/callback",
                "httpMethod": "GET",
                "queryStringParameters": { "code": "c", "state": "forged" }
            })))
            .await;
        assert_eq!(callback.status_code, 401);
        assert_eq!(callback.body, "Login failed!");
    }

    #[tokio::test]
    async fn test_unprefixed_path_resolves() {
        let (state, _dir) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1", &[]).await;
        let dispatcher = FunctionDispatcher::new(state);

        let response = dispatcher
            .handle(event(json!({ "path": "/tweets/nobody/50", "httpMethod": "GET" })))
            .await;

        assert_eq!(response.status_code, 401);
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = InvocationResponse {
            status_code: 200,
            headers: HashMap::new(),
            body: "ok".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "statusCode": 200, "headers": {}, "body": "ok" }));
    }
}
