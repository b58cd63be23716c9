use axum::{extract::State, Json};
use narrative_accounts::validate_user_id;
use narrative_billing::{CheckoutProvider, Plan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiError, extractors::ValidJson, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub id: String,
}

/// POST /create-checkout-session
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    validate_user_id(&req.user_id)?;
    let plan: Plan = req.plan.parse()?;

    let session = state
        .checkout
        .create_checkout_session(&req.user_id, plan)
        .await?;

    Ok(Json(CheckoutResponse { id: session.id }))
}
