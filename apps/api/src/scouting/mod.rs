//! Job scouting and market intelligence.
//!
//! Scouting is two-step: a search-grounded discovery call surfaces live
//! openings, then a JSON generation call over the grounding citations
//! packages each opening into an application bundle. Bundle ids, status, and
//! timestamps are assigned here — never trusted from the model.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::llm_client::{GatewayError, LlmClient, ModelCall, FLASH_MODEL};
use crate::models::report::{ApplicationBundle, BundleStatus, MarketBrief, SuggestedAnswer};

/// How many openings a scouting pass asks for.
const SCOUT_TARGET: usize = 5;

/// The scouting seam the autopilot drives. Carried as `Arc<dyn JobScout>` so
/// mission tests run without a network.
#[async_trait]
pub trait JobScout: Send + Sync {
    /// Whether a usable model credential is configured; checked at mission
    /// preflight before any pipeline work starts.
    fn has_credential(&self) -> bool;

    async fn scout(
        &self,
        skills: &[String],
        role: &str,
    ) -> Result<Vec<ApplicationBundle>, GatewayError>;
}

/// The production scout, backed by the shared LLM client.
pub struct GatewayScout {
    llm: LlmClient,
}

impl GatewayScout {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobScout for GatewayScout {
    fn has_credential(&self) -> bool {
        self.llm.has_credential()
    }

    async fn scout(
        &self,
        skills: &[String],
        role: &str,
    ) -> Result<Vec<ApplicationBundle>, GatewayError> {
        scout_jobs(&self.llm, skills, role).await
    }
}

/// One bundle as generated by the model — no id, status, or timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoutedBundle {
    company: String,
    role: String,
    url: String,
    tailored_pitch: String,
    match_reason: String,
    #[serde(default)]
    suggested_answers: Vec<SuggestedAnswer>,
}

impl ScoutedBundle {
    fn materialize(self) -> ApplicationBundle {
        ApplicationBundle {
            id: Uuid::new_v4().to_string(),
            company: self.company,
            role: self.role,
            url: self.url,
            status: BundleStatus::Prepared,
            tailored_pitch: self.tailored_pitch,
            match_reason: self.match_reason,
            suggested_answers: self.suggested_answers,
            timestamp: Utc::now(),
        }
    }
}

/// Discovers live openings for the role/skills and packages each into an
/// application bundle.
pub async fn scout_jobs(
    llm: &LlmClient,
    skills: &[String],
    role: &str,
) -> Result<Vec<ApplicationBundle>, GatewayError> {
    // Step 1: grounded discovery
    let discovery_prompt = prompts::SCOUT_DISCOVERY_PROMPT_TEMPLATE
        .replace("{target_count}", &SCOUT_TARGET.to_string())
        .replace("{role}", role)
        .replace("{skills}", &skills.join(", "));
    let discovery = llm
        .call(&ModelCall::new(FLASH_MODEL, discovery_prompt).grounded())
        .await?;

    info!(
        "scout discovery returned {} grounded sources for role '{role}'",
        discovery.sources.len()
    );

    // Step 2: bundle generation over the discovery output
    let sources_json = serde_json::to_string(&discovery.sources)?;
    let bundle_prompt = prompts::SCOUT_BUNDLE_PROMPT_TEMPLATE
        .replace("{target_count}", &SCOUT_TARGET.to_string())
        .replace("{search_results}", &sources_json)
        .replace("{discovery_notes}", &discovery.text)
        .replace("{role}", role);

    let scouted: Vec<ScoutedBundle> = llm
        .call_json(
            &ModelCall::new(FLASH_MODEL, bundle_prompt)
                .with_system(prompts::SCOUT_BUNDLE_SYSTEM)
                .json_output(),
        )
        .await?;

    Ok(scouted.into_iter().map(ScoutedBundle::materialize).collect())
}

/// Search-grounded market trends for a free-form query.
pub async fn search_market(
    llm: &LlmClient,
    query: &str,
) -> Result<MarketBrief, GatewayError> {
    let prompt = prompts::MARKET_SEARCH_PROMPT_TEMPLATE.replace("{query}", query);
    let reply = llm
        .call(&ModelCall::new(FLASH_MODEL, prompt).grounded())
        .await?;

    Ok(MarketBrief {
        title: query.to_string(),
        summary: reply.text,
        sources: reply.sources,
    })
}
