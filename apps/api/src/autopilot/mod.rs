//! Autopilot — a self-contained, sequential job-scouting mission.
//!
//! Phases run strictly in order: Preflight → Scouting → Analyzing →
//! Tailoring → Vaulting → Completed, with Aborted reachable from any
//! non-idle state. Each phase appends a loading log line, does its work (a
//! simulated delay plus, in Scouting, the one real gateway call), then flips
//! that line to success. Bundles are published atomically at Completed;
//! an aborted run never exposes partial bundles.
//!
//! Phase delays are injected so tests drive the whole pipeline instantly.

pub mod handlers;
pub mod log;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::GatewayError;
use crate::models::report::ApplicationBundle;
use crate::scouting::JobScout;

use self::log::{LogStatus, MissionLog};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionPhase {
    Idle,
    Preflight,
    Scouting,
    Analyzing,
    Tailoring,
    Vaulting,
    Completed,
    Aborted,
}

/// Simulated per-phase delays. Defaults mirror the interactive pacing; tests
/// use `instant()`.
#[derive(Debug, Clone, Copy)]
pub struct MissionTiming {
    pub boot: Duration,
    pub scouting: Duration,
    pub analyzing: Duration,
    pub tailoring_step: Duration,
    pub vaulting: Duration,
}

impl Default for MissionTiming {
    fn default() -> Self {
        Self {
            boot: Duration::from_millis(600),
            scouting: Duration::from_millis(1000),
            analyzing: Duration::from_millis(1200),
            tailoring_step: Duration::from_millis(700),
            vaulting: Duration::from_millis(800),
        }
    }
}

impl MissionTiming {
    pub fn instant() -> Self {
        Self {
            boot: Duration::ZERO,
            scouting: Duration::ZERO,
            analyzing: Duration::ZERO,
            tailoring_step: Duration::ZERO,
            vaulting: Duration::ZERO,
        }
    }
}

/// One mission's state, shared between the background runner and the status
/// surface.
#[derive(Debug)]
pub struct Mission {
    pub role: String,
    pub skills: Vec<String>,
    pub phase: MissionPhase,
    pub log: MissionLog,
    pub bundles: Vec<ApplicationBundle>,
    pub needs_credential: bool,
}

impl Mission {
    pub fn new(role: String, skills: Vec<String>) -> Self {
        Self {
            role,
            skills,
            phase: MissionPhase::Idle,
            log: MissionLog::default(),
            bundles: Vec::new(),
            needs_credential: false,
        }
    }
}

pub type MissionHandle = Arc<Mutex<Mission>>;

/// Registry of missions started this session. Missions are session-local and
/// never persisted; a finished mission nobody polls is simply garbage.
#[derive(Clone, Default)]
pub struct MissionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, MissionHandle>>>,
}

impl MissionRegistry {
    pub fn create(&self, role: String, skills: Vec<String>) -> (Uuid, MissionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Mission::new(role, skills)));
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .insert(id, Arc::clone(&handle));
        (id, handle)
    }

    pub fn get(&self, id: &Uuid) -> Option<MissionHandle> {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
    }
}

/// Runs one mission to Completed or Aborted.
pub async fn run_mission(mission: MissionHandle, scout: Arc<dyn JobScout>, timing: MissionTiming) {
    // Preflight: credential gate. On failure the log holds exactly one entry
    // and the pipeline never starts.
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.phase = MissionPhase::Preflight;
        if !scout.has_credential() {
            m.log.push(
                "AUTOPILOT_HALTED: Missing mission-critical API credentials.",
                LogStatus::Error,
            );
            m.needs_credential = true;
            m.phase = MissionPhase::Aborted;
            warn!("autopilot halted at preflight: no credential");
            return;
        }
        m.log.push(
            "System check: Initializing agent command center...",
            LogStatus::Loading,
        );
    }
    tokio::time::sleep(timing.boot).await;

    let (role, skills) = {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.log.update_last(
            LogStatus::Success,
            Some("System check: Command center online.".to_string()),
        );
        let line = format!(
            "Target profile: {} with {} core skills.",
            m.role,
            m.skills.len()
        );
        m.log.push(line, LogStatus::Info);
        (m.role.clone(), m.skills.clone())
    };

    // Scouting — the one phase with a real gateway call.
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.phase = MissionPhase::Scouting;
        m.log.push_tagged(
            "-> Triggering search engine grounding...",
            LogStatus::Info,
            Some("Scouting"),
        );
        m.log.push_tagged(
            "Phase 1: Deep web scouting...",
            LogStatus::Loading,
            Some("Scouting"),
        );
    }
    tokio::time::sleep(timing.scouting).await;

    let results = match scout.scout(&skills, &role).await {
        Ok(results) => results,
        Err(e) => {
            abort_mission(&mission, e);
            return;
        }
    };

    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.log.update_last(
            LogStatus::Success,
            Some(format!(
                "Phase 1: Found {} valid opportunities.",
                results.len()
            )),
        );
    }

    // Analyzing
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.phase = MissionPhase::Analyzing;
        m.log.push_tagged(
            "Phase 2: Match engine scoring...",
            LogStatus::Loading,
            Some("Analysis"),
        );
    }
    tokio::time::sleep(timing.analyzing).await;
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.log.update_last(
            LogStatus::Success,
            Some("Phase 2: Application strategy calculated.".to_string()),
        );
    }

    // Tailoring — one paired loading→success line per opportunity, in the
    // order the opportunities were returned.
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.phase = MissionPhase::Tailoring;
        m.log.push_tagged(
            "Phase 3: Tailoring content packets...",
            LogStatus::Info,
            Some("Tailoring"),
        );
    }
    for bundle in &results {
        {
            let mut m = mission.lock().expect("mission lock poisoned");
            m.log.push_tagged(
                format!("Engineering payload for {}...", bundle.company),
                LogStatus::Loading,
                Some("Tailoring"),
            );
        }
        tokio::time::sleep(timing.tailoring_step).await;
        {
            let mut m = mission.lock().expect("mission lock poisoned");
            m.log.update_last(
                LogStatus::Success,
                Some(format!(
                    "Payload [ID: {}] ready for {}.",
                    short_id(&bundle.id),
                    bundle.company
                )),
            );
        }
    }

    // Vaulting
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.phase = MissionPhase::Vaulting;
        m.log.push_tagged(
            "Phase 4: Syncing application vault...",
            LogStatus::Loading,
            Some("Vault"),
        );
    }
    tokio::time::sleep(timing.vaulting).await;
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.log.update_last(
            LogStatus::Success,
            Some("Vault sync complete. Ready for review.".to_string()),
        );
    }

    // Completed publishes the bundle list atomically.
    {
        let mut m = mission.lock().expect("mission lock poisoned");
        m.log
            .push("All tasks completed successfully.", LogStatus::Success);
        m.bundles = results;
        m.phase = MissionPhase::Completed;
    }
    info!("autopilot mission completed for role '{role}'");
}

/// Aborts the mission: credential failures re-gate preflight for the next
/// run, anything else logs a generic truncated error. Bundles from an
/// aborted run are discarded, never shown.
fn abort_mission(mission: &MissionHandle, err: GatewayError) {
    let mut m = mission.lock().expect("mission lock poisoned");
    if err.indicates_credential_failure() {
        m.log.push(
            "CRITICAL: API key mismatch or expired. Re-authentication required.",
            LogStatus::Error,
        );
        m.needs_credential = true;
    } else {
        m.log.push(
            format!("ERROR: Autopilot failed. {}...", truncate(&err.to_string(), 50)),
            LogStatus::Error,
        );
    }
    m.phase = MissionPhase::Aborted;
    warn!("autopilot mission aborted: {err}");
}

fn short_id(id: &str) -> String {
    id.chars().take(4).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::models::report::BundleStatus;

    enum ScoutBehavior {
        Succeed(usize),
        FailGeneric,
        FailCredential,
    }

    struct StubScout {
        credential: bool,
        behavior: ScoutBehavior,
    }

    fn stub_bundle(index: usize) -> ApplicationBundle {
        ApplicationBundle {
            id: Uuid::new_v4().to_string(),
            company: format!("Company {index}"),
            role: "Engineer".to_string(),
            url: format!("https://jobs.example/{index}"),
            status: BundleStatus::Prepared,
            tailored_pitch: "pitch".to_string(),
            match_reason: "reason".to_string(),
            suggested_answers: vec![],
            timestamp: Utc::now(),
        }
    }

    #[async_trait]
    impl JobScout for StubScout {
        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn scout(
            &self,
            _skills: &[String],
            _role: &str,
        ) -> Result<Vec<ApplicationBundle>, GatewayError> {
            match self.behavior {
                ScoutBehavior::Succeed(n) => Ok((0..n).map(stub_bundle).collect()),
                ScoutBehavior::FailGeneric => Err(GatewayError::Api {
                    status: 500,
                    message: "upstream exploded with a long diagnostic message \
                              that callers should never see in full"
                        .to_string(),
                }),
                ScoutBehavior::FailCredential => Err(GatewayError::Api {
                    status: 404,
                    message: "Requested entity was not found.".to_string(),
                }),
            }
        }
    }

    async fn run(credential: bool, behavior: ScoutBehavior) -> MissionHandle {
        let mission = Arc::new(Mutex::new(Mission::new(
            "Senior Engineer".to_string(),
            vec!["Rust".to_string(), "SQL".to_string()],
        )));
        let scout: Arc<dyn JobScout> = Arc::new(StubScout {
            credential,
            behavior,
        });
        run_mission(Arc::clone(&mission), scout, MissionTiming::instant()).await;
        mission
    }

    #[tokio::test]
    async fn test_missing_credential_halts_with_exactly_one_log_entry() {
        let mission = run(false, ScoutBehavior::Succeed(3)).await;
        let m = mission.lock().unwrap();

        assert_eq!(m.phase, MissionPhase::Aborted);
        assert!(m.needs_credential);
        assert_eq!(m.log.len(), 1, "no phase lines before the halt");
        assert_eq!(m.log.entries()[0].status, LogStatus::Error);
        assert!(m.log.entries()[0].message.starts_with("AUTOPILOT_HALTED"));
        assert!(m.bundles.is_empty());
    }

    #[tokio::test]
    async fn test_completed_mission_publishes_bundles() {
        let mission = run(true, ScoutBehavior::Succeed(3)).await;
        let m = mission.lock().unwrap();

        assert_eq!(m.phase, MissionPhase::Completed);
        assert_eq!(m.bundles.len(), 3);
        assert!(!m.needs_credential);

        let last = m.log.entries().last().unwrap();
        assert_eq!(last.status, LogStatus::Success);
        assert_eq!(last.message, "All tasks completed successfully.");
    }

    #[tokio::test]
    async fn test_tailoring_emits_one_flipped_line_per_opportunity_in_order() {
        let mission = run(true, ScoutBehavior::Succeed(4)).await;
        let m = mission.lock().unwrap();

        // Each sub-step's loading line was flipped in place, so the final log
        // holds exactly one success line per bundle, in return order.
        let payload_lines: Vec<&str> = m
            .log
            .entries()
            .iter()
            .filter(|e| e.message.starts_with("Payload [ID:"))
            .map(|e| e.message.as_str())
            .collect();

        assert_eq!(payload_lines.len(), 4);
        for (index, line) in payload_lines.iter().enumerate() {
            assert!(
                line.ends_with(&format!("ready for Company {index}.")),
                "line {index} out of order: {line}"
            );
        }
        assert!(m
            .log
            .entries()
            .iter()
            .filter(|e| e.sub_task.as_deref() == Some("Tailoring"))
            .all(|e| e.status != LogStatus::Loading));
    }

    #[tokio::test]
    async fn test_scouting_line_reports_opportunity_count() {
        let mission = run(true, ScoutBehavior::Succeed(2)).await;
        let m = mission.lock().unwrap();

        assert!(m
            .log
            .entries()
            .iter()
            .any(|e| e.message == "Phase 1: Found 2 valid opportunities."
                && e.status == LogStatus::Success));
    }

    #[tokio::test]
    async fn test_generic_failure_aborts_with_truncated_error() {
        let mission = run(true, ScoutBehavior::FailGeneric).await;
        let m = mission.lock().unwrap();

        assert_eq!(m.phase, MissionPhase::Aborted);
        assert!(!m.needs_credential);
        assert!(m.bundles.is_empty(), "aborted runs never expose bundles");

        let last = m.log.entries().last().unwrap();
        assert_eq!(last.status, LogStatus::Error);
        assert!(last.message.starts_with("ERROR: Autopilot failed."));
        assert!(last.message.ends_with("..."));
        // "ERROR: Autopilot failed. " + 50 chars + "..."
        assert!(last.message.chars().count() <= 25 + 50 + 3);
    }

    #[tokio::test]
    async fn test_credential_failure_mid_run_regates_preflight() {
        let mission = run(true, ScoutBehavior::FailCredential).await;
        let m = mission.lock().unwrap();

        assert_eq!(m.phase, MissionPhase::Aborted);
        assert!(m.needs_credential);
        let last = m.log.entries().last().unwrap();
        assert!(last.message.starts_with("CRITICAL: API key mismatch"));
        assert!(m.bundles.is_empty());
    }

    #[tokio::test]
    async fn test_registry_create_and_get() {
        let registry = MissionRegistry::default();
        let (id, _handle) = registry.create("Role".to_string(), vec!["Skill".to_string()]);

        assert!(registry.get(&id).is_some());
        assert!(registry.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_truncate_takes_at_most_max_chars() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
