//! Auto-save functionality for plan persistence.
//!
//! Provides periodic saving of the plan while it has unsaved changes.

use crate::document::PlanDocument;
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key the most recent autosave is also written under.
pub const LAST_DOCUMENT_KEY: &str = "__last_plan__";

/// Manages automatic plan persistence.
pub struct AutoSaveManager {
    storage: Arc<dyn Storage>,
    interval: Duration,
    last_save: Option<Instant>,
    /// Whether the plan has unsaved changes.
    dirty: bool,
    document_id: String,
}

impl AutoSaveManager {
    /// Create a new auto-save manager writing `document_id` to `storage`.
    pub fn new(storage: Arc<dyn Storage>, document_id: impl Into<String>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            document_id: document_id.into(),
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the plan as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }

        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            // Never saved, should save
            None => true,
        }
    }

    /// Save the plan if needed (dirty + interval elapsed).
    /// Returns true if a save was performed.
    pub fn maybe_save(&mut self, document: &PlanDocument, now: Instant) -> StorageResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }

        self.save(document, now)?;
        Ok(true)
    }

    /// Save the plan immediately.
    pub fn save(&mut self, document: &PlanDocument, now: Instant) -> StorageResult<()> {
        self.storage.save(&self.document_id, document)?;
        self.storage.save(LAST_DOCUMENT_KEY, document)?;

        log::info!("Autosaved {} ({} entities)", self.document_id, document.entity_count());
        self.last_save = Some(now);
        self.dirty = false;
        Ok(())
    }

    /// Load the most recently autosaved plan, if any.
    pub fn load_last(&mut self, now: Instant) -> Option<PlanDocument> {
        let document = self.storage.load(LAST_DOCUMENT_KEY).ok()?;
        self.dirty = false;
        self.last_save = Some(now);
        Some(document)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
