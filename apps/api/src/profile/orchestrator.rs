//! Profile Orchestrator — single authority for the live profile value and
//! its persistence cadence.
//!
//! Every producer (manual edit, resume auto-fill, identity sync) routes its
//! sparse update through `apply`: the merge happens here, the local save is
//! synchronous and never skipped, and the cloud push is debounced — a new
//! mutation cancels and supersedes any pending push, so only end-of-window
//! state ever leaves the process.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::models::profile::{ProfileUpdate, UserProfile};
use crate::models::report::ResumeReport;
use crate::profile::cloud::CloudSync;
use crate::profile::store::{ProfileStore, StorageError};

/// Producer-reported extraction confidence below this is surfaced to the
/// caller as unreliable. Exactly 60 is NOT low-confidence. The data is
/// applied either way; the orchestrator only relays the signal.
pub const CONFIDENCE_FLOOR: f64 = 60.0;

/// Result of one merge: the post-merge snapshot plus the relayed
/// low-confidence signal.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub profile: UserProfile,
    pub low_confidence: bool,
}

/// The most recent resume analysis, cached with the text that produced it so
/// the analyzer surface can redisplay without recomputation.
#[derive(Debug, Clone)]
pub struct AnalysisCache {
    pub resume_text: String,
    pub report: ResumeReport,
}

pub struct ProfileOrchestrator {
    store: ProfileStore,
    cloud: Arc<dyn CloudSync>,
    debounce: Duration,
    // Shared with the debounce task, which snapshots it at fire time.
    profile: Arc<Mutex<UserProfile>>,
    pending_push: Mutex<Option<JoinHandle<()>>>,
    analysis: Mutex<Option<AnalysisCache>>,
}

impl ProfileOrchestrator {
    /// Loads the local slot (or seeds a default), then performs the one-shot
    /// authoritative remote refresh: if a remote record exists it replaces
    /// the local profile outright — remote wins on startup, no merge.
    /// Callers must not serve traffic until this returns.
    pub async fn bootstrap(
        store: ProfileStore,
        cloud: Arc<dyn CloudSync>,
        debounce: Duration,
    ) -> Result<Arc<Self>, StorageError> {
        let local = store.load().unwrap_or_else(UserProfile::seed);

        let orchestrator = Arc::new(Self {
            store,
            cloud,
            debounce,
            profile: Arc::new(Mutex::new(local)),
            pending_push: Mutex::new(None),
            analysis: Mutex::new(None),
        });

        if let Some(mut remote) = orchestrator.cloud.pull().await {
            info!("remote profile found; replacing local copy");
            let stamp = orchestrator.store.save(&remote)?;
            remote.last_synced = Some(stamp);
            *orchestrator.profile.lock().expect("profile lock poisoned") = remote;
        }

        Ok(orchestrator)
    }

    /// A read-only copy of the live profile.
    pub fn snapshot(&self) -> UserProfile {
        self.profile.lock().expect("profile lock poisoned").clone()
    }

    /// Merges a sparse update, saves locally (synchronous, never skipped),
    /// and (re)arms the debounced cloud push.
    pub fn apply(&self, update: ProfileUpdate) -> Result<MergeOutcome, StorageError> {
        let low_confidence = update
            .confidence
            .map(|score| score < CONFIDENCE_FLOOR)
            .unwrap_or(false);

        let profile = {
            let mut live = self.profile.lock().expect("profile lock poisoned");
            live.merge(&update);
            let stamp = self.store.save(&live)?;
            live.last_synced = Some(stamp);
            live.clone()
        };

        self.schedule_push();

        Ok(MergeOutcome {
            profile,
            low_confidence,
        })
    }

    /// Arms (or re-arms) the cloud push: at most one pending push exists per
    /// quiet period, and the payload is snapshotted when the timer fires, so
    /// coalesced intermediate states are never pushed.
    fn schedule_push(&self) {
        let mut pending = self.pending_push.lock().expect("push lock poisoned");
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let profile = Arc::clone(&self.profile);
        let cloud = Arc::clone(&self.cloud);
        let debounce = self.debounce;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let snapshot = profile.lock().expect("profile lock poisoned").clone();
            cloud.push(&snapshot).await;
        }));
    }

    /// Escape hatch: drops the durable slot, any pending push, and the
    /// analysis cache, and reseeds the live profile.
    pub fn clear(&self) -> Result<UserProfile, StorageError> {
        if let Some(previous) = self
            .pending_push
            .lock()
            .expect("push lock poisoned")
            .take()
        {
            previous.abort();
        }

        self.store.clear()?;
        let seed = UserProfile::seed();
        *self.profile.lock().expect("profile lock poisoned") = seed.clone();
        *self.analysis.lock().expect("analysis lock poisoned") = None;
        Ok(seed)
    }

    pub fn record_analysis(&self, resume_text: String, report: ResumeReport) {
        *self.analysis.lock().expect("analysis lock poisoned") = Some(AnalysisCache {
            resume_text,
            report,
        });
    }

    pub fn analysis(&self) -> Option<AnalysisCache> {
        self.analysis.lock().expect("analysis lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct MemoryCloud {
        remote: Option<UserProfile>,
        pushes: Mutex<Vec<UserProfile>>,
    }

    impl MemoryCloud {
        fn new(remote: Option<UserProfile>) -> Arc<Self> {
            Arc::new(Self {
                remote,
                pushes: Mutex::new(Vec::new()),
            })
        }

        fn pushed(&self) -> Vec<UserProfile> {
            self.pushes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CloudSync for MemoryCloud {
        async fn push(&self, profile: &UserProfile) -> bool {
            self.pushes.lock().unwrap().push(profile.clone());
            true
        }

        async fn pull(&self) -> Option<UserProfile> {
            self.remote.clone()
        }
    }

    const DEBOUNCE: Duration = Duration::from_millis(2000);

    async fn orchestrator_with(
        cloud: Arc<MemoryCloud>,
    ) -> (TempDir, Arc<ProfileOrchestrator>) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();
        let cloud: Arc<dyn CloudSync> = cloud;
        let orchestrator = ProfileOrchestrator::bootstrap(store, cloud, DEBOUNCE)
            .await
            .unwrap();
        (dir, orchestrator)
    }

    fn remote_profile() -> UserProfile {
        UserProfile {
            name: "Remote Rita".to_string(),
            ..UserProfile::seed()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_remote_wins_outright() {
        let cloud = MemoryCloud::new(Some(remote_profile()));
        let (_dir, orchestrator) = orchestrator_with(cloud).await;

        let live = orchestrator.snapshot();
        assert_eq!(live.name, "Remote Rita");
        // the authoritative refresh also lands in the local slot
        assert!(live.last_synced.is_some());
    }

    #[tokio::test]
    async fn test_bootstrap_keeps_local_when_remote_absent() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(cloud).await;
        assert_eq!(orchestrator.snapshot().name, UserProfile::seed().name);
    }

    #[tokio::test]
    async fn test_apply_saves_locally_before_returning() {
        let cloud = MemoryCloud::new(None);
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();
        let cloud: Arc<dyn CloudSync> = cloud;
        let orchestrator = ProfileOrchestrator::bootstrap(store.clone(), cloud, DEBOUNCE)
            .await
            .unwrap();

        orchestrator
            .apply(ProfileUpdate {
                bio: Some("fresh bio".to_string()),
                ..Default::default()
            })
            .unwrap();

        let persisted = store.load().unwrap();
        assert_eq!(persisted.bio, "fresh bio");
        assert_eq!(persisted, orchestrator.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_push_of_final_state() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(Arc::clone(&cloud)).await;

        for bio in ["one", "two", "three"] {
            orchestrator
                .apply(ProfileUpdate {
                    bio: Some(bio.to_string()),
                    ..Default::default()
                })
                .unwrap();
        }

        tokio::time::sleep(DEBOUNCE * 2).await;

        let pushes = cloud.pushed();
        assert_eq!(pushes.len(), 1, "one push per quiet period");
        assert_eq!(pushes[0].bio, "three", "payload is end-of-window state");
        // no edit was lost locally either
        assert_eq!(orchestrator.snapshot().bio, "three");
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_mutation_supersedes_pending_push() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(Arc::clone(&cloud)).await;

        orchestrator
            .apply(ProfileUpdate {
                bio: Some("early".to_string()),
                ..Default::default()
            })
            .unwrap();

        tokio::time::sleep(DEBOUNCE / 2).await;

        orchestrator
            .apply(ProfileUpdate {
                bio: Some("late".to_string()),
                ..Default::default()
            })
            .unwrap();

        tokio::time::sleep(DEBOUNCE * 2).await;

        let pushes = cloud.pushed();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].bio, "late");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_edits_push_once_each() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(Arc::clone(&cloud)).await;

        orchestrator
            .apply(ProfileUpdate {
                bio: Some("first".to_string()),
                ..Default::default()
            })
            .unwrap();
        tokio::time::sleep(DEBOUNCE * 2).await;

        orchestrator
            .apply(ProfileUpdate {
                bio: Some("second".to_string()),
                ..Default::default()
            })
            .unwrap();
        tokio::time::sleep(DEBOUNCE * 2).await;

        let pushes = cloud.pushed();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].bio, "first");
        assert_eq!(pushes[1].bio, "second");
    }

    #[tokio::test]
    async fn test_confidence_floor_boundary() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(cloud).await;

        let low = orchestrator
            .apply(ProfileUpdate {
                confidence: Some(59.0),
                ..Default::default()
            })
            .unwrap();
        assert!(low.low_confidence);

        let at_floor = orchestrator
            .apply(ProfileUpdate {
                confidence: Some(60.0),
                ..Default::default()
            })
            .unwrap();
        assert!(!at_floor.low_confidence, "exactly 60 is not low-confidence");

        let absent = orchestrator.apply(ProfileUpdate::default()).unwrap();
        assert!(!absent.low_confidence);
    }

    #[tokio::test]
    async fn test_low_confidence_does_not_suppress_merge() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(cloud).await;

        let outcome = orchestrator
            .apply(ProfileUpdate {
                bio: Some("applied anyway".to_string()),
                confidence: Some(10.0),
                ..Default::default()
            })
            .unwrap();

        assert!(outcome.low_confidence);
        assert_eq!(orchestrator.snapshot().bio, "applied anyway");
    }

    #[tokio::test]
    async fn test_clear_reseeds_and_drops_cache() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(cloud).await;

        orchestrator
            .apply(ProfileUpdate {
                name: Some("Jane".to_string()),
                ..Default::default()
            })
            .unwrap();
        orchestrator.record_analysis(
            "resume text".to_string(),
            ResumeReport {
                overall_score: 50.0,
                strengths: vec![],
                improvements: vec![],
                skills_found: vec![],
                suggested_roles: vec![],
            },
        );

        orchestrator.clear().unwrap();

        assert_eq!(orchestrator.snapshot().name, UserProfile::seed().name);
        assert!(orchestrator.analysis().is_none());
    }

    #[tokio::test]
    async fn test_analysis_cache_round_trip() {
        let cloud = MemoryCloud::new(None);
        let (_dir, orchestrator) = orchestrator_with(cloud).await;

        assert!(orchestrator.analysis().is_none());

        orchestrator.record_analysis(
            "the text".to_string(),
            ResumeReport {
                overall_score: 81.0,
                strengths: vec!["metrics".to_string()],
                improvements: vec![],
                skills_found: vec![],
                suggested_roles: vec![],
            },
        );

        let cached = orchestrator.analysis().unwrap();
        assert_eq!(cached.resume_text, "the text");
        assert!((cached.report.overall_score - 81.0).abs() < f64::EPSILON);
    }
}
