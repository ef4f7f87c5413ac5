//! Profile Store — the durable local slot for the canonical profile, plus
//! the visitor identity token used to key the remote record.
//!
//! Malformed local data must never crash startup: `load` degrades to
//! "no record" and logs a diagnostic. Writes go through a temp file and a
//! rename so the slot never holds a partial record.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::profile::UserProfile;

const PROFILE_SLOT: &str = "career_strategist_user_data.json";
const VISITOR_SLOT: &str = "cs_visitor_id";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self) -> PathBuf {
        self.dir.join(PROFILE_SLOT)
    }

    /// Persists the profile, stamping `lastSynced` with the current time.
    /// Returns the stamp so the caller can mirror it onto its live copy.
    pub fn save(&self, profile: &UserProfile) -> Result<String, StorageError> {
        let stamp = Utc::now().to_rfc3339();
        let mut record = profile.clone();
        record.last_synced = Some(stamp.clone());

        let payload = serde_json::to_vec_pretty(&record)?;
        let path = self.slot_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &payload)?;
        fs::rename(&tmp, &path)?;

        debug!("profile saved to local slot ({} bytes)", payload.len());
        Ok(stamp)
    }

    /// Reads the slot. Absent and malformed slots both yield `None`;
    /// malformed data logs a diagnostic and is otherwise ignored.
    pub fn load(&self) -> Option<UserProfile> {
        let path = self.slot_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read profile slot {:?}: {e}", path);
                return None;
            }
        };

        match serde_json::from_slice(&data) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("failed to parse stored profile, treating as no record: {e}");
                None
            }
        }
    }

    /// Removes the slot. Missing slot is not an error.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent get-or-create of the stable per-installation visitor id
    /// that keys the remote record. Generated once, cached in its own slot,
    /// reused thereafter. An unreadable or corrupt slot is regenerated.
    pub fn visitor_id(&self) -> Result<Uuid, StorageError> {
        let path = self.dir.join(VISITOR_SLOT);

        if let Some(id) = read_visitor_slot(&path) {
            return Ok(id);
        }

        let id = Uuid::new_v4();
        fs::write(&path, id.to_string())?;
        debug!("generated visitor id {id}");
        Ok(id)
    }
}

fn read_visitor_slot(path: &Path) -> Option<Uuid> {
    let raw = fs::read_to_string(path).ok()?;
    match raw.trim().parse() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!("visitor id slot is corrupt, regenerating");
            None
        }
    }
}
