#![allow(dead_code)]

//! The canonical user profile and its partial-update machinery.
//!
//! Exactly one live `UserProfile` exists per process; every mutation flows
//! through `ProfileOrchestrator::apply`, never through a handler writing the
//! record directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Name seeded into a fresh profile. The dashboard strength score treats a
/// profile still carrying this name as "default-ish".
pub const SEED_NAME: &str = "Alex Johnson";

/// Sentinel the resume parser returns when no name is present in the text.
pub const NAME_UNKNOWN: &str = "Unknown";
/// Sentinel the resume parser returns when no target role is identifiable.
pub const ROLE_NOT_IDENTIFIED: &str = "Role Not Identified";
/// Sentinel the identity sync returns for fields it could not source.
pub const NOT_PUBLIC: &str = "Information not public";

/// The single canonical record describing the user.
///
/// Serialized shape (camelCase) is the durable local slot format:
/// `{name, email, targetRole, location, bio, skills, hasResume, resumeName,
/// lastSynced}`. `skills` keeps comma-joined list semantics. `last_synced`
/// is set only by the store on save, never by a producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub target_role: String,
    pub location: String,
    pub bio: String,
    pub skills: String,
    pub has_resume: bool,
    pub resume_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<String>,
}

impl UserProfile {
    /// The profile seeded at session start when no persisted record exists.
    pub fn seed() -> Self {
        Self {
            name: SEED_NAME.to_string(),
            email: "alex.j@example.com".to_string(),
            target_role: "Senior Product Designer".to_string(),
            location: "San Francisco, CA".to_string(),
            bio: "Passionate designer with 6+ years of experience in fintech and SaaS. \
                  Expert in user-centric design systems and cross-functional leadership."
                .to_string(),
            skills: "Figma, React, TypeScript, User Research, Design Systems".to_string(),
            has_resume: true,
            resume_name: "Resume_v2_final.pdf".to_string(),
            last_synced: None,
        }
    }

    /// Shallow-merges a sparse update: supplied fields overwrite, omitted
    /// fields retain their prior value. Last merge wins; there is no
    /// field-level versioning. Sentinel filtering happens when the update is
    /// constructed, so by the time a field reaches here it is real data.
    pub fn merge(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(target_role) = &update.target_role {
            self.target_role = target_role.clone();
        }
        if let Some(location) = &update.location {
            self.location = location.clone();
        }
        if let Some(bio) = &update.bio {
            self.bio = bio.clone();
        }
        if let Some(skills) = &update.skills {
            self.skills = skills.clone();
        }
        if let Some(resume_name) = &update.resume_name {
            self.resume_name = resume_name.clone();
        }
        if let Some(has_resume) = update.has_resume {
            self.has_resume = has_resume;
        }
    }

    /// Skills as a trimmed list, splitting on commas. Empty string → empty list.
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Dashboard profile-strength metric, 0–100.
///
/// Scoring: +20 name present and changed from the seed (+10 if still the
/// seed), +30 bio over 50 chars (+15 if any), +30 more than 3 comma-separated
/// skills (+15 if any), +20 resume on file. Capped at 100.
pub fn strength_score(profile: &UserProfile) -> u8 {
    let mut score: u32 = 0;

    if !profile.name.is_empty() {
        score += if profile.name != SEED_NAME { 20 } else { 10 };
    }

    if !profile.bio.is_empty() {
        score += if profile.bio.len() > 50 { 30 } else { 15 };
    }

    if !profile.skills.is_empty() {
        score += if profile.skills.split(',').count() > 3 {
            30
        } else {
            15
        };
    }

    if profile.has_resume {
        score += 20;
    }

    score.min(100) as u8
}

/// A sparse partial update proposed by one producer (manual edit, resume
/// auto-fill, identity sync). `None` means "no information" — including
/// fields the producer returned as a sentinel value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub target_role: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub resume_name: Option<String>,
    pub has_resume: Option<bool>,
    /// Producer-reported extraction confidence (0–100), attached only by the
    /// resume parser. The orchestrator relays a low-confidence signal to the
    /// caller without ever suppressing the merge.
    #[serde(skip)]
    pub confidence: Option<f64>,
}

/// Filters a producer-supplied field down to real information: trims it and
/// drops empties plus any of the listed sentinel values.
pub fn informative(value: &str, sentinels: &[&str]) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || sentinels.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        return None;
    }
    Some(trimmed.to_string())
}

/// One row of the remote `profiles` table, keyed by the visitor id.
/// The remote shape carries no `location` column.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub target_role: String,
    pub bio: String,
    pub skills: String,
    pub has_resume: bool,
    pub resume_name: String,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Reconstructs a profile from the remote row. Location is standardized
    /// to "Remote" since the row does not carry one.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            name: self.name,
            email: self.email,
            target_role: self.target_role,
            location: "Remote".to_string(),
            bio: self.bio,
            skills: self.skills,
            has_resume: self.has_resume,
            resume_name: self.resume_name,
            last_synced: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_profile() -> UserProfile {
        UserProfile {
            name: String::new(),
            email: String::new(),
            target_role: String::new(),
            location: String::new(),
            bio: String::new(),
            skills: String::new(),
            has_resume: false,
            resume_name: String::new(),
            last_synced: None,
        }
    }

    #[test]
    fn test_strength_score_default_ish_profile_is_10() {
        let profile = UserProfile {
            name: SEED_NAME.to_string(),
            has_resume: false,
            ..blank_profile()
        };
        assert_eq!(strength_score(&profile), 10);
    }

    #[test]
    fn test_strength_score_filled_profile_is_90() {
        let profile = UserProfile {
            name: SEED_NAME.to_string(),
            bio: "x".repeat(60),
            skills: "A,B,C,D".to_string(),
            has_resume: true,
            ..blank_profile()
        };
        // 10 (seed name) + 30 (long bio) + 30 (4 skills) + 20 (resume)
        assert_eq!(strength_score(&profile), 90);
    }

    #[test]
    fn test_strength_score_caps_at_100() {
        let profile = UserProfile {
            name: "Jane Doe".to_string(),
            bio: "y".repeat(80),
            skills: "A,B,C,D,E".to_string(),
            has_resume: true,
            ..blank_profile()
        };
        assert_eq!(strength_score(&profile), 100);
    }

    #[test]
    fn test_merge_overwrites_supplied_and_retains_omitted() {
        let mut profile = UserProfile::seed();
        let before_email = profile.email.clone();

        profile.merge(&ProfileUpdate {
            name: Some("Jane".to_string()),
            bio: Some("New bio".to_string()),
            ..Default::default()
        });

        assert_eq!(profile.name, "Jane");
        assert_eq!(profile.bio, "New bio");
        assert_eq!(profile.email, before_email);
    }

    #[test]
    fn test_informative_drops_sentinels_and_empties() {
        assert_eq!(informative("  ", &[]), None);
        assert_eq!(informative("Unknown", &[NAME_UNKNOWN]), None);
        assert_eq!(informative("unknown", &[NAME_UNKNOWN]), None);
        assert_eq!(
            informative("Role Not Identified", &[ROLE_NOT_IDENTIFIED]),
            None
        );
        assert_eq!(
            informative("  Jane Doe  ", &[NAME_UNKNOWN]),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn test_profile_slot_shape_is_camel_case() {
        let mut profile = UserProfile::seed();
        profile.last_synced = Some("2026-01-01T00:00:00Z".to_string());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("targetRole").is_some());
        assert!(json.get("hasResume").is_some());
        assert!(json.get("resumeName").is_some());
        assert!(json.get("lastSynced").is_some());
        assert!(json.get("target_role").is_none());
    }

    #[test]
    fn test_skill_list_trims_and_drops_empties() {
        let profile = UserProfile {
            skills: "Rust, Go,, SQL ".to_string(),
            ..blank_profile()
        };
        assert_eq!(profile.skill_list(), vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn test_remote_row_reconstructs_with_standardized_location() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            target_role: "PM".to_string(),
            bio: "bio".to_string(),
            skills: "A,B".to_string(),
            has_resume: true,
            resume_name: "cv.pdf".to_string(),
            updated_at: Utc::now(),
        };
        let profile = row.into_profile();
        assert_eq!(profile.location, "Remote");
        assert_eq!(profile.name, "Jane");
        assert!(profile.last_synced.is_none());
    }
}
