use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use narrative_accounts::AccountsError;
use narrative_billing::BillingError;
use narrative_x::XError;
use serde::Serialize;

/// Plain-text body of a failed login
pub const LOGIN_FAILED: &str = "Login failed!";

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not authenticated")]
    Unauthorized,

    /// OAuth callback failure, rendered as plain text for the browser
    #[error("Login failed")]
    LoginFailed(StatusCode),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Not authenticated".to_string(),
            ),
            ApiError::LoginFailed(status) => return (status, LOGIN_FAILED).into_response(),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<AccountsError> for ApiError {
    fn from(error: AccountsError) -> Self {
        match error {
            AccountsError::InvalidUserId(_) => ApiError::InvalidRequest(error.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<XError> for ApiError {
    fn from(error: XError) -> Self {
        match error {
            XError::Unauthenticated(user_id) => {
                tracing::debug!(user_id = %user_id, "No usable session");
                ApiError::Unauthorized
            }
            XError::Accounts(inner) => inner.into(),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        match error {
            BillingError::InvalidPlan(_) => ApiError::InvalidRequest(error.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

/// Map a failed callback exchange to the browser-facing response
///
/// Provider and state rejections are 401; store failures are 500.
pub fn login_failed(error: XError) -> ApiError {
    match error {
        XError::UpstreamAuth(_)
        | XError::AuthorizationStateInvalid
        | XError::Accounts(AccountsError::InvalidUserId(_)) => {
            tracing::warn!(error = %error, "Login rejected");
            ApiError::LoginFailed(StatusCode::UNAUTHORIZED)
        }
        other => {
            tracing::error!(error = %other, "Login failed");
            ApiError::LoginFailed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
