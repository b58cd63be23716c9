use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{login_failed, ApiError},
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters of the provider redirect
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
    /// Set by the provider when the user declines
    #[serde(default)]
    pub error: Option<String>,
}

/// `302 Found` to `location`
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let request = state.auth_service.begin_login().await?;
    Ok(found(&request.authorize_url))
}

/// GET /auth/callback
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    if let Some(error) = &query.error {
        tracing::warn!(error = %error, "Provider returned an authorization error");
        if let Err(e) = state.auth_service.discard(&query.state).await {
            tracing::error!("Failed to discard declined OAuth state: {}", e);
        }
        return Err(ApiError::LoginFailed(StatusCode::UNAUTHORIZED));
    }

    let user_id = state
        .auth_service
        .exchange_code(&query.code, &query.state)
        .await
        .map_err(login_failed)?;

    let location = state.config.post_login_url(&user_id)?;
    Ok(found(&location))
}
