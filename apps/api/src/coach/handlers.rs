use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::coach::{career_advice, career_roadmap, skill_gap};
use crate::errors::AppError;
use crate::llm_client::ChatTurn;
use crate::models::report::{CareerPathNode, SkillScore};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/v1/coach/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    let reply = career_advice(&state.llm, &req.message, req.history).await?;
    Ok(Json(ChatResponse { reply }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub current_role: String,
    pub goal_role: String,
}

/// POST /api/v1/coach/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Json(req): Json<RoadmapRequest>,
) -> Result<Json<Vec<CareerPathNode>>, AppError> {
    if req.current_role.trim().is_empty() || req.goal_role.trim().is_empty() {
        return Err(AppError::Validation(
            "currentRole and goalRole must not be empty".to_string(),
        ));
    }
    let steps = career_roadmap(&state.llm, &req.current_role, &req.goal_role).await?;
    Ok(Json(steps))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapRequest {
    /// Defaults to the live profile's skills when omitted.
    pub skills: Option<Vec<String>>,
    /// Defaults to the live profile's target role when omitted.
    pub target_role: Option<String>,
}

/// POST /api/v1/coach/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(req): Json<SkillGapRequest>,
) -> Result<Json<Vec<SkillScore>>, AppError> {
    let profile = state.orchestrator.snapshot();
    let skills = req.skills.unwrap_or_else(|| profile.skill_list());
    let target_role = req.target_role.unwrap_or(profile.target_role);

    if skills.is_empty() {
        return Err(AppError::Validation(
            "no skills to analyze — add skills to the profile first".to_string(),
        ));
    }

    let scores = skill_gap(&state.llm, &skills, &target_role).await?;
    Ok(Json(scores))
}
