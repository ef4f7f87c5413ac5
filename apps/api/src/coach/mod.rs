//! Career coaching — conversational advice, roadmap generation, and
//! skill-gap scoring.

pub mod handlers;
pub mod prompts;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatTurn, GatewayError, LlmClient, ModelCall, FLASH_MODEL};
use crate::models::report::{CareerPathNode, SkillScore};

/// Free-text career advice, aware of the prior conversation.
pub async fn career_advice(
    llm: &LlmClient,
    message: &str,
    history: Vec<ChatTurn>,
) -> Result<String, GatewayError> {
    let reply = llm
        .call(
            &ModelCall::new(FLASH_MODEL, message)
                .with_system(prompts::STRATEGIST_SYSTEM)
                .with_history(history),
        )
        .await?;
    Ok(reply.text)
}

/// A 4-step professional roadmap from the current role to the goal role.
pub async fn career_roadmap(
    llm: &LlmClient,
    current_role: &str,
    goal_role: &str,
) -> Result<Vec<CareerPathNode>, GatewayError> {
    let prompt = prompts::ROADMAP_PROMPT_TEMPLATE
        .replace("{current_role}", current_role)
        .replace("{goal_role}", goal_role);
    llm.call_json(
        &ModelCall::new(FLASH_MODEL, prompt)
            .with_system(JSON_ONLY_SYSTEM)
            .json_output(),
    )
    .await
}

/// Per-skill current-vs-market scores for a target role.
pub async fn skill_gap(
    llm: &LlmClient,
    skills: &[String],
    target_role: &str,
) -> Result<Vec<SkillScore>, GatewayError> {
    let prompt = prompts::SKILL_GAP_PROMPT_TEMPLATE
        .replace("{skills}", &skills.join(", "))
        .replace("{target_role}", target_role);
    llm.call_json(
        &ModelCall::new(FLASH_MODEL, prompt)
            .with_system(JSON_ONLY_SYSTEM)
            .json_output(),
    )
    .await
}
