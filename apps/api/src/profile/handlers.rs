use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::{strength_score, ProfileUpdate, UserProfile};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    /// Dashboard profile-strength metric, 0–100.
    pub strength: u8,
}

impl ProfileResponse {
    fn from_profile(profile: UserProfile) -> Self {
        let strength = strength_score(&profile);
        Self { profile, strength }
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    Json(ProfileResponse::from_profile(state.orchestrator.snapshot()))
}

/// PATCH /api/v1/profile — manual sparse edit, merged through the orchestrator.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let outcome = state.orchestrator.apply(update)?;
    Ok(Json(ProfileResponse::from_profile(outcome.profile)))
}

/// DELETE /api/v1/profile — clears the durable slot and reseeds (escape hatch).
pub async fn handle_clear_profile(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.orchestrator.clear()?;
    Ok(StatusCode::NO_CONTENT)
}
