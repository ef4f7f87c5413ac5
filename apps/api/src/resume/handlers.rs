use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::models::report::ResumeReport;
use crate::resume::{analyze_resume, ingest_resume, sanitize_text};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub profile: UserProfile,
    pub report: ResumeReport,
    /// True when the parser's self-reported confidence fell below the floor;
    /// the data is applied regardless, this only warns the user.
    pub low_confidence: bool,
}

/// POST /api/v1/resume/ingest — multipart resume upload through the full
/// parse + analyze + merge pipeline.
pub async fn handle_ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("resume.txt").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((file_name, data));
        }
    }

    let (file_name, data) = upload
        .ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;

    info!("ingesting resume {file_name} ({} bytes)", data.len());
    let outcome = ingest_resume(&state.llm, &state.orchestrator, &file_name, &data).await?;

    Ok(Json(IngestResponse {
        profile: outcome.profile,
        report: outcome.report,
        low_confidence: outcome.low_confidence,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub target_role: Option<String>,
}

/// POST /api/v1/resume/analyze — scores pasted resume text without touching
/// the profile; the result replaces the analysis cache.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ResumeReport>, AppError> {
    let text = sanitize_text(&req.resume_text);
    if text.is_empty() {
        return Err(AppError::Validation(
            "Resume text is empty after sanitation.".to_string(),
        ));
    }

    let report = analyze_resume(&state.llm, &text, req.target_role.as_deref()).await?;
    state.orchestrator.record_analysis(text, report.clone());
    Ok(Json(report))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAnalysisResponse {
    pub resume_text: String,
    pub report: ResumeReport,
}

/// GET /api/v1/resume/analysis — redisplays the cached report without
/// recomputation.
pub async fn handle_cached_analysis(
    State(state): State<AppState>,
) -> Result<Json<CachedAnalysisResponse>, AppError> {
    let cached = state
        .orchestrator
        .analysis()
        .ok_or_else(|| AppError::NotFound("No resume analysis cached yet".to_string()))?;
    Ok(Json(CachedAnalysisResponse {
        resume_text: cached.resume_text,
        report: cached.report,
    }))
}
