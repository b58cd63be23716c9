//! Error types for the billing subsystem.

use thiserror::Error;

/// Result type alias for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

/// Billing subsystem errors
#[derive(Debug, Error)]
pub enum BillingError {
    /// Plan name is not one of the offered plans
    #[error("Unknown plan: {0}")]
    InvalidPlan(String),

    /// Checkout provider rejected the request
    #[error("Checkout provider error: {0}")]
    Provider(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configured URL could not be used
    #[error("Invalid billing configuration: {0}")]
    ConfigInvalid(String),
}
