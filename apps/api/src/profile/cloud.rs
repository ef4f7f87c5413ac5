//! Cloud Sync Adapter — best-effort mirror of the local profile to a remote
//! `profiles` table keyed by the visitor id.
//!
//! The adapter never owns data and never raises: `push` degrades to `false`,
//! `pull` degrades to `None`. Remote unavailability must leave the service in
//! local-only operation with nothing but log noise.
//!
//! Remote table:
//! ```sql
//! CREATE TABLE profiles (
//!     id          UUID PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     email       TEXT NOT NULL,
//!     target_role TEXT NOT NULL,
//!     bio         TEXT NOT NULL,
//!     skills      TEXT NOT NULL,
//!     has_resume  BOOLEAN NOT NULL,
//!     resume_name TEXT NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::profile::{ProfileRow, UserProfile};

/// The sync seam the orchestrator talks to. Carried as `Arc<dyn CloudSync>`
/// so tests can substitute an in-memory double.
#[async_trait]
pub trait CloudSync: Send + Sync {
    /// Upserts the profile under the visitor id. Overwrite on id match,
    /// last writer wins. Failures are swallowed to `false`.
    async fn push(&self, profile: &UserProfile) -> bool;

    /// Fetches the profile for the visitor id. Not found, transport failure,
    /// and a malformed row all yield `None` — the caller's fallback (keep the
    /// local profile) is identical either way.
    async fn pull(&self) -> Option<UserProfile>;
}

pub struct PgCloudSync {
    pool: PgPool,
    visitor_id: Uuid,
}

impl PgCloudSync {
    pub fn new(pool: PgPool, visitor_id: Uuid) -> Self {
        Self { pool, visitor_id }
    }
}

#[async_trait]
impl CloudSync for PgCloudSync {
    async fn push(&self, profile: &UserProfile) -> bool {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles
                (id, name, email, target_role, bio, skills, has_resume, resume_name, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                target_role = EXCLUDED.target_role,
                bio = EXCLUDED.bio,
                skills = EXCLUDED.skills,
                has_resume = EXCLUDED.has_resume,
                resume_name = EXCLUDED.resume_name,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(self.visitor_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.target_role)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(profile.has_resume)
        .bind(&profile.resume_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("cloud sync: pushed profile for visitor {}", self.visitor_id);
                true
            }
            Err(e) => {
                warn!("cloud sync failed, continuing local-only: {e}");
                false
            }
        }
    }

    async fn pull(&self) -> Option<UserProfile> {
        let result = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, email, target_role, bio, skills, has_resume, resume_name, updated_at \
             FROM profiles WHERE id = $1",
        )
        .bind(self.visitor_id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Some(row.into_profile()),
            Ok(None) => {
                // Never synced from this installation; not an outage.
                debug!("cloud fetch: no remote record for visitor {}", self.visitor_id);
                None
            }
            Err(e) => {
                warn!("cloud fetch failed, using local fallback: {e}");
                None
            }
        }
    }
}
