use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tap_store::{CrudStore, DocumentStore, InMemoryBackend};
use tap_types::{Badge, CheckIn, CheckInPatch, Mission, Pub};
use tap_urls::{ObjectUrlRegistry, UrlEntry, UrlRevoker, UrlTracker};
use tracing::{debug, info, warn};

use crate::config::TaproomConfig;
use crate::error::{SdkError, SdkResult};
use crate::seed::SeedData;

/// A freshly captured image, not yet uploaded anywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    pub data: Bytes,
    pub mime_type: String,
}

impl Photo {
    pub fn jpeg(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CheckInRequest {
    pub pub_id: String,
    pub user_id: String,
    pub photo: Option<Photo>,
}

/// One user's progress through one mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissionProgress {
    pub mission_id: String,
    pub name: String,
    pub visited: usize,
    pub total: usize,
    pub percent: u8,
    pub complete: bool,
}

/// High-level Taproom API.
///
/// Owns one [`CrudStore`] per collection plus the URL machinery for
/// captured photos. Every check-in mutation re-syncs the [`UrlTracker`]
/// against the current check-in list, so a photo's `blob:` URL lives exactly
/// as long as its check-in does.
pub struct Taproom {
    config: TaproomConfig,
    pubs: Arc<dyn CrudStore<Pub>>,
    check_ins: Arc<dyn CrudStore<CheckIn>>,
    badges: Arc<dyn CrudStore<Badge>>,
    missions: Arc<dyn CrudStore<Mission>>,
    registry: Arc<ObjectUrlRegistry>,
    tracker: Mutex<UrlTracker>,
}

impl Taproom {
    /// Build on caller-supplied stores.
    pub fn with_stores(
        config: TaproomConfig,
        pubs: Arc<dyn CrudStore<Pub>>,
        check_ins: Arc<dyn CrudStore<CheckIn>>,
        badges: Arc<dyn CrudStore<Badge>>,
        missions: Arc<dyn CrudStore<Mission>>,
    ) -> Self {
        let registry = Arc::new(ObjectUrlRegistry::new(config.url_origin.clone()));
        let tracker = UrlTracker::with_scheme(registry.clone(), config.ephemeral_scheme.clone());
        Self {
            config,
            pubs,
            check_ins,
            badges,
            missions,
            registry,
            tracker: Mutex::new(tracker),
        }
    }

    /// Build on in-memory document backends populated from `seed`.
    pub fn in_memory(config: TaproomConfig, seed: SeedData) -> SdkResult<Self> {
        seed.validate()?;
        info!(
            pubs = seed.pubs.len(),
            badges = seed.badges.len(),
            missions = seed.missions.len(),
            dev_mode = config.dev_mode,
            "starting in-memory taproom"
        );
        Ok(Self::with_stores(
            config,
            document_store(seed.pubs),
            document_store(Vec::new()),
            document_store(seed.badges),
            document_store(seed.missions),
        ))
    }

    pub fn config(&self) -> &TaproomConfig {
        &self.config
    }

    pub fn pubs(&self) -> &Arc<dyn CrudStore<Pub>> {
        &self.pubs
    }

    pub fn check_ins(&self) -> &Arc<dyn CrudStore<CheckIn>> {
        &self.check_ins
    }

    pub fn badges(&self) -> &Arc<dyn CrudStore<Badge>> {
        &self.badges
    }

    pub fn missions(&self) -> &Arc<dyn CrudStore<Mission>> {
        &self.missions
    }

    pub fn registry(&self) -> &Arc<ObjectUrlRegistry> {
        &self.registry
    }

    // ---- Check-ins ----

    pub async fn check_in(&self, request: CheckInRequest) -> SdkResult<CheckIn> {
        self.check_in_at(request, Utc::now()).await
    }

    /// Record a check-in as of `now`.
    ///
    /// Unless `dev_mode` is set, a user may check into a given pub at most
    /// once per cooldown window. A captured photo is exposed as an
    /// ephemeral URL for as long as the check-in exists.
    pub async fn check_in_at(
        &self,
        request: CheckInRequest,
        now: DateTime<Utc>,
    ) -> SdkResult<CheckIn> {
        self.pubs.load_once().await?;
        self.check_ins.load_once().await?;

        let venue = self
            .pubs
            .find(&request.pub_id)
            .ok_or_else(|| SdkError::UnknownPub(request.pub_id.clone()))?;

        if self.config.dev_mode {
            debug!(user = %request.user_id, pub_id = %venue.id, "dev mode: skipping check-in validation");
        } else {
            self.enforce_cooldown(&request, now)?;
        }

        let image_url = match &request.photo {
            Some(photo) => Some(self.registry.create(photo.data.clone(), &photo.mime_type)?),
            None => None,
        };

        let mut check_in = CheckIn::new(&venue.id, &request.user_id, now);
        check_in.image_url = image_url.clone();
        check_in.points_awarded = if venue.points > 0 {
            venue.points
        } else {
            self.config.points_per_check_in
        };

        let stored = match self.check_ins.add(check_in).await {
            Ok(stored) => stored,
            Err(e) => {
                // Never handed to the tracker, so release it here.
                if let Some(url) = image_url {
                    self.registry.revoke(&url)?;
                }
                return Err(e.into());
            }
        };
        info!(
            id = %stored.id,
            user = %stored.user_id,
            pub_id = %stored.pub_id,
            points = stored.points_awarded,
            "checked in"
        );
        self.sync_urls()?;
        Ok(stored)
    }

    /// Delete a check-in; its photo URL is revoked.
    pub async fn remove_check_in(&self, id: &str) -> SdkResult<()> {
        self.check_ins.remove(id).await?;
        self.sync_urls()
    }

    /// Point a check-in at its uploaded photo; the local blob URL is revoked.
    pub async fn attach_uploaded_photo(&self, id: &str, url: &str) -> SdkResult<CheckIn> {
        let patch = CheckInPatch {
            image_url: Some(Some(url.to_string())),
            points_awarded: None,
        };
        let updated = self.check_ins.update(id, patch).await?;
        debug!(%id, %url, "photo uploaded");
        self.sync_urls()?;
        Ok(updated)
    }

    /// Reload check-ins from the source and reconcile photo URLs.
    pub async fn refresh_check_ins(&self) -> SdkResult<()> {
        self.check_ins.load().await?;
        self.sync_urls()
    }

    /// Check-ins of one user, newest first.
    pub fn check_ins_for(&self, user_id: &str) -> Vec<CheckIn> {
        let mut mine: Vec<CheckIn> = self
            .check_ins
            .snapshot()
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    fn enforce_cooldown(&self, request: &CheckInRequest, now: DateTime<Utc>) -> SdkResult<()> {
        let window = Duration::hours(i64::from(self.config.check_in_cooldown_hours));
        let recent = self.check_ins.data().with(|items| {
            items.iter().any(|c| {
                c.user_id == request.user_id
                    && c.pub_id == request.pub_id
                    && now.signed_duration_since(c.created_at) < window
            })
        });
        if recent {
            warn!(user = %request.user_id, pub_id = %request.pub_id, "check-in inside cooldown");
            return Err(SdkError::CheckInRejected(format!(
                "already checked into {} within the last {} hours",
                request.pub_id, self.config.check_in_cooldown_hours
            )));
        }
        Ok(())
    }

    fn sync_urls(&self) -> SdkResult<()> {
        let items = self.check_ins.snapshot();
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|e| SdkError::Url(tap_urls::UrlError::Poisoned(e.to_string())))?;
        tracker.track_urls(
            items
                .iter()
                .map(|c| UrlEntry::new(&c.id, c.image_url.as_deref())),
        )?;
        Ok(())
    }

    /// Number of photo URLs currently held alive by check-ins.
    pub fn tracked_urls(&self) -> SdkResult<usize> {
        let tracker = self
            .tracker
            .lock()
            .map_err(|e| SdkError::Url(tap_urls::UrlError::Poisoned(e.to_string())))?;
        Ok(tracker.tracked_count())
    }

    /// Revoke every tracked photo URL.
    pub fn shutdown(&self) -> SdkResult<()> {
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|e| SdkError::Url(tap_urls::UrlError::Poisoned(e.to_string())))?;
        tracker.cleanup()?;
        info!(live = self.registry.live_count()?, "taproom shut down");
        Ok(())
    }

    // ---- Scoring ----

    pub fn points_for(&self, user_id: &str) -> u32 {
        self.check_ins.data().with(|items| {
            items
                .iter()
                .filter(|c| c.user_id == user_id)
                .map(|c| c.points_awarded)
                .sum()
        })
    }

    pub async fn earned_badges(&self, user_id: &str) -> SdkResult<Vec<Badge>> {
        self.badges.load_once().await?;
        let mine = self.check_ins_for(user_id);
        Ok(self
            .badges
            .snapshot()
            .into_iter()
            .filter(|b| b.is_earned_by(&mine))
            .collect())
    }

    pub async fn mission_progress(&self, user_id: &str) -> SdkResult<Vec<MissionProgress>> {
        self.missions.load_once().await?;
        let mine = self.check_ins_for(user_id);
        let visited: HashSet<&str> = mine.iter().map(|c| c.pub_id.as_str()).collect();
        Ok(self
            .missions
            .snapshot()
            .iter()
            .map(|m| MissionProgress {
                mission_id: m.id.clone(),
                name: m.name.clone(),
                visited: m.completed_count(&visited),
                total: m.pub_ids.iter().collect::<HashSet<_>>().len(),
                percent: m.progress_percent(&visited),
                complete: m.is_complete(&visited),
            })
            .collect())
    }
}

impl std::fmt::Debug for Taproom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Taproom")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("tracked_urls", &self.tracked_urls().ok())
            .finish()
    }
}

fn document_store<T: tap_types::Entity>(docs: Vec<T>) -> Arc<dyn CrudStore<T>> {
    Arc::new(DocumentStore::<T, _>::new(InMemoryBackend::with_documents(docs)))
}
