//! Dirty tracking, autosave ticks, and save coalescing.
//!
//! The editor runs on one logical thread and only suspends at store I/O,
//! so a mutation can land while a save is in flight. Dirt is therefore
//! tracked as a revision counter rather than a boolean: a save
//! acknowledges exactly the revision it serialized, and an acknowledgment
//! can never clear dirt produced by a later mutation.

use crate::store::{SaveAck, SceneStore, StoreResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tableplan_core::scene::SceneDocument;

/// Default autosave interval.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(8);

/// Drives explicit saves and periodic autosave against a scene store.
pub struct SaveScheduler<S: SceneStore> {
    store: Arc<S>,
    interval: Duration,
    /// Revision of the latest mutation.
    revision: u64,
    /// Highest revision acknowledged by a successful save.
    saved_revision: u64,
    in_flight: bool,
    stopped: bool,
    last_save: Option<Instant>,
}

impl<S: SceneStore> SaveScheduler<S> {
    /// Create a scheduler over a store with the default interval.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            interval: DEFAULT_AUTOSAVE_INTERVAL,
            revision: 0,
            saved_revision: 0,
            in_flight: false,
            stopped: false,
            last_save: None,
        }
    }

    /// Set the autosave interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Get the autosave interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Note that the scene mutated. Call after every committed change.
    pub fn mark_mutated(&mut self) {
        self.revision += 1;
    }

    /// Whether there are mutations newer than the last acknowledged save.
    pub fn is_dirty(&self) -> bool {
        self.revision > self.saved_revision
    }

    /// Whether an autosave tick should trigger a save right now.
    pub fn should_autosave(&self) -> bool {
        if !self.is_dirty() || self.in_flight || self.stopped {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Cancel future autosave ticks (navigating away from the editor).
    ///
    /// An in-flight save is left to finish; its result no longer affects
    /// scheduling.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether the scheduler has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Claim the in-flight slot, returning the revision this save covers.
    ///
    /// Returns None when a save is already in flight; the caller must not
    /// start another (coalescing).
    pub fn begin_save(&mut self) -> Option<u64> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(self.revision)
    }

    /// Release the in-flight slot with the outcome of a save started at
    /// `pending_revision`. Failed saves leave the dirty state untouched.
    pub fn complete_save(&mut self, pending_revision: u64, succeeded: bool) {
        self.in_flight = false;
        if self.stopped {
            return;
        }
        if succeeded {
            self.saved_revision = self.saved_revision.max(pending_revision);
            self.last_save = Some(Instant::now());
        }
    }

    /// Save now, unless a save is already in flight (returns Ok(None)).
    pub async fn save_now(&mut self, document: &SceneDocument) -> StoreResult<Option<SaveAck>> {
        let Some(pending) = self.begin_save() else {
            log::debug!("save already in flight, coalescing");
            return Ok(None);
        };
        let store = Arc::clone(&self.store);
        let result = store.save(document).await;
        match result {
            Ok(ack) => {
                self.complete_save(pending, true);
                Ok(Some(ack))
            }
            Err(err) => {
                self.complete_save(pending, false);
                log::warn!("save failed, retaining dirty state: {err}");
                Err(err)
            }
        }
    }

    /// One autosave tick. Saves only when dirty, idle, unstopped, and the
    /// interval has elapsed. Returns true when a save was performed.
    pub async fn maybe_autosave(&mut self, document: &SceneDocument) -> StoreResult<bool> {
        if !self.should_autosave() {
            return Ok(false);
        }
        Ok(self.save_now(document).await?.is_some())
    }

    /// Link the scene to a business record, saving first if the scene has
    /// never been persisted. Updates `document.id` from a fresh save ack.
    pub async fn assign_to_record(
        &mut self,
        document: &mut SceneDocument,
        record_id: &str,
    ) -> StoreResult<()> {
        if document.id.is_none() {
            if let Some(ack) = self.save_now(document).await? {
                document.id = Some(ack.scene_id);
            }
        }
        let scene_id = document
            .id
            .clone()
            .ok_or(crate::store::StoreError::MissingSceneId)?;
        let store = Arc::clone(&self.store);
        store.assign(&scene_id, record_id).await
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
