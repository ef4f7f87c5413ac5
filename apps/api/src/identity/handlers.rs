use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::identity::{identity_update, sync_identity, IdentityPreview};
use crate::models::profile::UserProfile;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub profile_url: String,
    pub identity_hint: Option<String>,
}

/// POST /api/v1/identity/sync — grounded lookup returning a preview.
/// Nothing is merged here; the preview awaits explicit user approval.
pub async fn handle_sync(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<IdentityPreview>, AppError> {
    if req.profile_url.trim().is_empty() {
        return Err(AppError::Validation(
            "profileUrl must not be empty".to_string(),
        ));
    }

    let preview = sync_identity(
        &state.llm,
        req.profile_url.trim(),
        req.identity_hint.as_deref(),
    )
    .await?;

    info!(
        "identity sync confirmed for {} ({} sources)",
        req.profile_url,
        preview.sources.len()
    );
    Ok(Json(preview))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub skills: String,
}

/// POST /api/v1/identity/apply — merges user-approved preview fields.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let outcome = state.orchestrator.apply(identity_update(
        &req.name,
        &req.headline,
        &req.bio,
        &req.skills,
    ))?;
    Ok(Json(outcome.profile))
}
