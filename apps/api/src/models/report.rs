#![allow(dead_code)]

//! Typed results returned by the AI gateway's career-intelligence operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_client::SourceRef;

/// Resume analysis report. Immutable once produced; cached alongside the
/// resume text that generated it so the analyzer surface can redisplay
/// without recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeReport {
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub skills_found: Vec<String>,
    pub suggested_roles: Vec<String>,
}

/// One skill compared against market demand, both on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    pub current: f64,
    pub market: f64,
}

/// One step of a generated career roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPathNode {
    pub role: String,
    pub salary_range: String,
    /// 0–10.
    pub difficulty: f64,
    pub description: String,
    pub key_skills: Vec<String>,
}

/// A search-grounded market summary with its source citations.
#[derive(Debug, Clone, Serialize)]
pub struct MarketBrief {
    pub title: String,
    pub summary: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    Prepared,
    Visited,
}

/// One packaged job-application artifact for one discovered opportunity.
///
/// `id`, `status`, and `timestamp` are assigned client-side when the bundle
/// is materialized — never trusted from the model. Bundles are session-local
/// and are published only by a completed autopilot mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBundle {
    pub id: String,
    pub company: String,
    pub role: String,
    pub url: String,
    pub status: BundleStatus,
    pub tailored_pitch: String,
    pub match_reason: String,
    #[serde(default)]
    pub suggested_answers: Vec<SuggestedAnswer>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_report_round_trips_camel_case() {
        let json = r#"{
            "overallScore": 72,
            "strengths": ["Clear impact metrics"],
            "improvements": ["Add a summary section"],
            "skillsFound": ["Rust", "SQL"],
            "suggestedRoles": ["Backend Engineer"]
        }"#;
        let report: ResumeReport = serde_json::from_str(json).unwrap();
        assert!((report.overall_score - 72.0).abs() < f64::EPSILON);
        assert_eq!(report.skills_found.len(), 2);
    }

    #[test]
    fn test_bundle_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BundleStatus::Prepared).unwrap(),
            r#""prepared""#
        );
        assert_eq!(
            serde_json::to_string(&BundleStatus::Visited).unwrap(),
            r#""visited""#
        );
    }

    #[test]
    fn test_bundle_tolerates_missing_suggested_answers() {
        let json = r#"{
            "id": "abc",
            "company": "Acme",
            "role": "Engineer",
            "url": "https://acme.example/jobs/1",
            "status": "prepared",
            "tailoredPitch": "pitch",
            "matchReason": "reason",
            "timestamp": "2026-01-01T00:00:00Z"
        }"#;
        let bundle: ApplicationBundle = serde_json::from_str(json).unwrap();
        assert!(bundle.suggested_answers.is_empty());
    }
}
