//! Resume intelligence — text extraction and sanitation, evidence-only
//! parsing into profile fields, and scoring against a target role.
//!
//! The parse and analyze calls run concurrently; their results flow through
//! the orchestrator's merge (sentinels filtered, `has_resume` forced true)
//! and the analysis cache.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;

use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::{GatewayError, LlmClient, ModelCall, FLASH_MODEL};
use crate::models::profile::{
    informative, ProfileUpdate, UserProfile, NAME_UNKNOWN, ROLE_NOT_IDENTIFIED,
};
use crate::models::report::ResumeReport;
use crate::profile::orchestrator::ProfileOrchestrator;

/// Structured output of the evidence-only resume parse.
/// `name`/`target_role` may carry the documented sentinels; the merge layer
/// treats those as "no information".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeExtraction {
    pub name: String,
    pub target_role: String,
    pub bio: String,
    pub skills: String,
    /// 0–100, the model's self-reported readability of the source text.
    pub confidence_score: f64,
}

/// Strips non-printable characters often found in raw PDF/DOCX reads and
/// collapses all whitespace runs to single spaces.
pub fn sanitize_text(raw: &str) -> String {
    let printable: String = raw
        .chars()
        .map(|c| {
            if (' '..='~').contains(&c) || c == '\n' {
                c
            } else {
                ' '
            }
        })
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pulls text out of an uploaded resume: PDF payloads go through the PDF
/// text extractor, anything else is read as (lossy) UTF-8.
pub fn extract_text(data: &[u8]) -> Result<String, AppError> {
    if data.starts_with(b"%PDF") {
        return pdf_extract::extract_text_from_mem(data).map_err(|e| {
            AppError::Validation(format!(
                "Format error: could not read text from this file ({e}). \
                 Upload a .txt file for maximum accuracy."
            ))
        });
    }
    Ok(String::from_utf8_lossy(data).into_owned())
}

/// Evidence-only extraction of profile fields from resume text.
pub async fn parse_resume(
    llm: &LlmClient,
    resume_text: &str,
) -> Result<ResumeExtraction, GatewayError> {
    let prompt = prompts::RESUME_PARSE_PROMPT_TEMPLATE
        .replace(
            "{evidence_instruction}",
            crate::llm_client::prompts::EVIDENCE_INSTRUCTION,
        )
        .replace("{resume_text}", resume_text);
    llm.call_json(
        &ModelCall::new(FLASH_MODEL, prompt)
            .with_system(prompts::RESUME_PARSE_SYSTEM)
            .json_output(),
    )
    .await
}

/// Scores resume text against a target role.
pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    target_role: Option<&str>,
) -> Result<ResumeReport, GatewayError> {
    let prompt = prompts::RESUME_ANALYZE_PROMPT_TEMPLATE
        .replace("{target_role}", target_role.filter(|r| !r.is_empty()).unwrap_or("General"))
        .replace("{resume_text}", resume_text);
    llm.call_json(
        &ModelCall::new(FLASH_MODEL, prompt)
            .with_system(prompts::RESUME_ANALYZE_SYSTEM)
            .json_output(),
    )
    .await
}

/// Builds the resume producer's partial update: sentinel values become "no
/// information", `has_resume` is forced true, and the parser's confidence
/// rides along for the orchestrator to relay.
pub fn extraction_update(extraction: &ResumeExtraction, file_name: &str) -> ProfileUpdate {
    ProfileUpdate {
        name: informative(&extraction.name, &[NAME_UNKNOWN]),
        target_role: informative(&extraction.target_role, &[ROLE_NOT_IDENTIFIED]),
        bio: informative(&extraction.bio, &[]),
        skills: informative(&extraction.skills, &[]),
        resume_name: Some(file_name.to_string()),
        has_resume: Some(true),
        confidence: Some(extraction.confidence_score),
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub profile: UserProfile,
    pub report: ResumeReport,
    pub low_confidence: bool,
}

/// The full upload pipeline: extract → sanitize → (parse ∥ analyze) →
/// merge through the orchestrator → cache the analysis.
pub async fn ingest_resume(
    llm: &LlmClient,
    orchestrator: &Arc<ProfileOrchestrator>,
    file_name: &str,
    data: &[u8],
) -> Result<IngestOutcome, AppError> {
    let text = sanitize_text(&extract_text(data)?);
    if text.is_empty() {
        return Err(AppError::Validation(
            "Resume contained no readable text.".to_string(),
        ));
    }

    let target_role = orchestrator.snapshot().target_role;
    let (extraction, report) = tokio::try_join!(
        parse_resume(llm, &text),
        analyze_resume(llm, &text, Some(&target_role)),
    )?;

    let outcome = orchestrator.apply(extraction_update(&extraction, file_name))?;
    orchestrator.record_analysis(text, report.clone());

    Ok(IngestOutcome {
        profile: outcome.profile,
        report,
        low_confidence: outcome.low_confidence,
    })
}
