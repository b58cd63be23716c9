use axum::extract::State;
use narrative_accounts::{ProfileUpdate, SessionStore};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::ApiError, extractors::ValidJson, state::AppState};

pub const PROFILE_SAVED: &str = "Profile saved!";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub user_id: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub guidance: Option<String>,
}

/// POST /save-profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SaveProfileRequest>,
) -> Result<&'static str, ApiError> {
    let update = ProfileUpdate {
        tone: req.tone,
        length: req.length,
        guidance: req.guidance,
    };

    state.sessions.save_profile(&req.user_id, update).await?;

    Ok(PROFILE_SAVED)
}
