//! Identity sync — search-grounded extraction of public profile data for a
//! specific profile URL, hard-gated on the model's own match confidence.
//!
//! A result with `match_confirmed` false (or missing) is an identity
//! mismatch, surfaced distinctly from a gateway failure: "found something,
//! but didn't trust it" is not "found nothing". Gated results never reach
//! the profile; applying a preview is a separate, explicitly user-approved
//! call.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, ModelCall, SourceRef, PRO_MODEL};
use crate::models::profile::{informative, ProfileUpdate, NOT_PUBLIC};

/// Raw structured fields returned by the identity lookup.
/// `match_confirmed` defaults false so a missing flag gates exactly like an
/// explicit refusal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityFields {
    name: String,
    headline: String,
    bio: String,
    skills: String,
    #[serde(default)]
    match_confirmed: bool,
}

/// A confirmed identity lookup, paired with the citations it was derived
/// from. Only ever constructed after the confidence gate passes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPreview {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub skills: String,
    pub sources: Vec<SourceRef>,
}

/// Looks up public profile data for the exact URL, anchored to the optional
/// identity hint. Returns `AppError::IdentityMismatch` when the model does
/// not confirm the match.
pub async fn sync_identity(
    llm: &LlmClient,
    profile_url: &str,
    identity_hint: Option<&str>,
) -> Result<IdentityPreview, AppError> {
    let anchor = identity_hint.filter(|h| !h.is_empty()).unwrap_or("None provided");
    let prompt = prompts::IDENTITY_SYNC_PROMPT_TEMPLATE
        .replace(
            "{evidence_instruction}",
            crate::llm_client::prompts::EVIDENCE_INSTRUCTION,
        )
        .replace("{profile_url}", profile_url)
        .replace("{identity_anchor}", anchor);

    let (fields, sources): (IdentityFields, Vec<SourceRef>) = llm
        .call_json_with_sources(
            &ModelCall::new(PRO_MODEL, prompt)
                .with_system(prompts::IDENTITY_SYNC_SYSTEM)
                .grounded()
                .json_output(),
        )
        .await?;

    if !fields.match_confirmed {
        return Err(AppError::IdentityMismatch);
    }

    Ok(IdentityPreview {
        name: fields.name,
        headline: fields.headline,
        bio: fields.bio,
        skills: fields.skills,
        sources,
    })
}

/// Builds the identity producer's partial update from user-approved preview
/// fields. The headline stands in for the target role; "not public"
/// sentinels carry no information.
pub fn identity_update(
    name: &str,
    headline: &str,
    bio: &str,
    skills: &str,
) -> ProfileUpdate {
    ProfileUpdate {
        name: informative(name, &[NOT_PUBLIC]),
        target_role: informative(headline, &[NOT_PUBLIC]),
        bio: informative(bio, &[NOT_PUBLIC]),
        skills: informative(skills, &[NOT_PUBLIC]),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::UserProfile;

    #[test]
    fn test_missing_match_flag_gates_like_false() {
        let json = r#"{
            "name": "Jane Doe",
            "headline": "Designer",
            "bio": "bio",
            "skills": "Figma"
        }"#;
        let fields: IdentityFields = serde_json::from_str(json).unwrap();
        assert!(!fields.match_confirmed);
    }

    #[test]
    fn test_identity_update_filters_not_public_sentinels() {
        let update = identity_update("Jane", NOT_PUBLIC, NOT_PUBLIC, "Rust, SQL");
        assert_eq!(update.name, Some("Jane".to_string()));
        assert_eq!(update.target_role, None);
        assert_eq!(update.bio, None);
        assert_eq!(update.skills, Some("Rust, SQL".to_string()));
    }

    #[test]
    fn test_applying_identity_update_retains_gated_fields() {
        let mut profile = UserProfile::seed();
        let before_bio = profile.bio.clone();

        profile.merge(&identity_update(
            "Synced Name",
            "Synced Headline",
            NOT_PUBLIC,
            "",
        ));

        assert_eq!(profile.name, "Synced Name");
        assert_eq!(profile.target_role, "Synced Headline");
        assert_eq!(profile.bio, before_bio);
    }
}
