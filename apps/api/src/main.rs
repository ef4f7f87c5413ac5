mod autopilot;
mod coach;
mod config;
mod db;
mod errors;
mod identity;
mod llm_client;
mod models;
mod profile;
mod resume;
mod routes;
mod scouting;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::autopilot::{MissionRegistry, MissionTiming};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::profile::cloud::PgCloudSync;
use crate::profile::orchestrator::ProfileOrchestrator;
use crate::profile::store::ProfileStore;
use crate::routes::build_router;
use crate::scouting::GatewayScout;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Strategist API v{}", env!("CARGO_PKG_VERSION"));

    // Local store + stable visitor identity token
    let store = ProfileStore::new(&config.data_dir)?;
    let visitor_id = store.visitor_id()?;
    info!("visitor id: {visitor_id}");

    // Remote mirror (lazy pool: a down database degrades to local-only)
    let pool = create_pool(&config.database_url)?;
    let cloud = Arc::new(PgCloudSync::new(pool, visitor_id));

    // Bootstrap the profile before serving: the one-shot authoritative
    // remote refresh happens here, so no handler ever sees a pre-sync state.
    let orchestrator = ProfileOrchestrator::bootstrap(
        store,
        cloud,
        Duration::from_millis(config.sync_debounce_ms),
    )
    .await?;
    info!("profile orchestrator ready");

    // LLM client (may be credential-less; gateway features then fail fast
    // and the autopilot halts at preflight)
    let llm = LlmClient::new(config.gemini_api_key.clone());
    if !llm.has_credential() {
        info!("no GEMINI_API_KEY configured — AI features disabled until one is set");
    }

    let state = AppState {
        llm: llm.clone(),
        orchestrator,
        scout: Arc::new(GatewayScout::new(llm)),
        missions: MissionRegistry::default(),
        timing: MissionTiming::default(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
