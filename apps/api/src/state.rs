use std::sync::Arc;

use crate::autopilot::{MissionRegistry, MissionTiming};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::orchestrator::ProfileOrchestrator;
use crate::scouting::JobScout;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Sole owner of the live profile; handlers only hold snapshots.
    pub orchestrator: Arc<ProfileOrchestrator>,
    /// Pluggable scouting backend. Default: `GatewayScout` over the shared
    /// LLM client; tests substitute a stub.
    pub scout: Arc<dyn JobScout>,
    pub missions: MissionRegistry,
    pub timing: MissionTiming,
    /// Retained for handlers that need runtime configuration.
    #[allow(dead_code)]
    pub config: Config,
}
