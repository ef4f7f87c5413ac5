pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::autopilot::handlers as autopilot_handlers;
use crate::coach::handlers as coach_handlers;
use crate::identity::handlers as identity_handlers;
use crate::profile::handlers as profile_handlers;
use crate::resume::handlers as resume_handlers;
use crate::scouting::handlers as scouting_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile_handlers::handle_get_profile)
                .patch(profile_handlers::handle_update_profile)
                .delete(profile_handlers::handle_clear_profile),
        )
        // Resume
        .route("/api/v1/resume/ingest", post(resume_handlers::handle_ingest))
        .route(
            "/api/v1/resume/analyze",
            post(resume_handlers::handle_analyze),
        )
        .route(
            "/api/v1/resume/analysis",
            get(resume_handlers::handle_cached_analysis),
        )
        // Identity sync
        .route("/api/v1/identity/sync", post(identity_handlers::handle_sync))
        .route(
            "/api/v1/identity/apply",
            post(identity_handlers::handle_apply),
        )
        // Coaching
        .route("/api/v1/coach/chat", post(coach_handlers::handle_chat))
        .route("/api/v1/coach/roadmap", post(coach_handlers::handle_roadmap))
        .route(
            "/api/v1/coach/skill-gap",
            post(coach_handlers::handle_skill_gap),
        )
        // Market
        .route(
            "/api/v1/market/search",
            post(scouting_handlers::handle_market_search),
        )
        // Autopilot
        .route(
            "/api/v1/autopilot/missions",
            post(autopilot_handlers::handle_launch),
        )
        .route(
            "/api/v1/autopilot/missions/:id",
            get(autopilot_handlers::handle_status),
        )
        .with_state(state)
}
