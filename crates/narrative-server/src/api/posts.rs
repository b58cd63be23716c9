use axum::{
    extract::{Path, State},
    Json,
};
use narrative_accounts::validate_user_id;
use narrative_x::Post;
use std::sync::Arc;

use crate::{error::ApiError, state::AppState};

/// Parse the `count` path segment
pub fn parse_count(raw: &str) -> Result<u32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid count: {}", raw)))
}

/// GET /tweets/:user_id/:count
pub async fn get_posts(
    State(state): State<Arc<AppState>>,
    Path((user_id, count)): Path<(String, String)>,
) -> Result<Json<Vec<Post>>, ApiError> {
    validate_user_id(&user_id)?;
    let count = parse_count(&count)?;

    let posts = state.content_service.fetch_content(&user_id, count).await?;

    Ok(Json(posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("50").unwrap(), 50);
        assert!(parse_count("fifty").is_err());
        assert!(parse_count("-1").is_err());
        assert!(parse_count("").is_err());
    }
}
