use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::autopilot::log::LogEntry;
use crate::autopilot::{run_mission, MissionPhase};
use crate::errors::AppError;
use crate::models::report::ApplicationBundle;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LaunchRequest {
    pub role: String,
    /// Comma-joined skill list, same semantics as the profile field.
    pub skills: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    pub mission_id: Uuid,
}

/// POST /api/v1/autopilot/missions — starts a mission in the background.
pub async fn handle_launch(
    State(state): State<AppState>,
    Json(req): Json<LaunchRequest>,
) -> Result<Json<LaunchResponse>, AppError> {
    let role = req.role.trim().to_string();
    let skills: Vec<String> = req
        .skills
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if role.is_empty() || skills.is_empty() {
        return Err(AppError::Validation(
            "role and skills are both required to launch a mission".to_string(),
        ));
    }

    let (mission_id, handle) = state.missions.create(role, skills);
    info!("launching autopilot mission {mission_id}");
    tokio::spawn(run_mission(handle, state.scout.clone(), state.timing));

    Ok(Json(LaunchResponse { mission_id }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionStatus {
    pub mission_id: Uuid,
    pub phase: MissionPhase,
    pub needs_credential: bool,
    pub log: Vec<LogEntry>,
    pub bundles: Vec<ApplicationBundle>,
}

/// GET /api/v1/autopilot/missions/:id — snapshot of phase, log, and bundles.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MissionStatus>, AppError> {
    let handle = state
        .missions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Mission {id} not found")))?;

    let mission = handle.lock().expect("mission lock poisoned");
    Ok(Json(MissionStatus {
        mission_id: id,
        phase: mission.phase,
        needs_credential: mission.needs_credential,
        log: mission.log.entries().to_vec(),
        bundles: mission.bundles.clone(),
    }))
}
