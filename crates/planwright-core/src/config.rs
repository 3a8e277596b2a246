//! Editor tunables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the tool state machine and its collaborators.
///
/// Every field has a default, so a partial JSON file only overrides the
/// values it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing the pointer snaps to.
    pub snap_interval: i64,
    /// Maximum distance for snapping to an existing vertex.
    pub vertex_snap_range: f64,
    /// Maximum distance between a fixture and the wall it attaches to.
    pub fixture_attach_distance: f64,
    /// Time a selection must age before a press relocates it.
    pub move_debounce_ms: u64,
    /// Minimum time between two undo (or two redo) steps.
    pub history_interval_ms: u64,
    /// Minimum time between two saves.
    pub save_interval_ms: u64,
    /// Lifetime of a user-facing message.
    pub message_lifetime_ms: u64,
    /// Additive zoom change per wheel notch.
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Keyboard scroll speed in model units per second.
    pub scroll_speed: f64,
    /// Keyboard scroll speed while SHIFT is held.
    pub fast_scroll_speed: f64,
    /// Number of drawing layers.
    pub layer_count: u8,
    /// Autosave interval, `None` disables autosave.
    pub autosave_interval_secs: Option<u64>,
    /// Document id used for saves.
    pub document_id: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_interval: 6,
            vertex_snap_range: 6.0,
            fixture_attach_distance: 100.0,
            move_debounce_ms: 250,
            history_interval_ms: 150,
            save_interval_ms: 1000,
            message_lifetime_ms: 5000,
            zoom_step: 0.05,
            min_zoom: 0.05,
            max_zoom: 10.0,
            scroll_speed: 500.0,
            fast_scroll_speed: 3000.0,
            layer_count: 4,
            autosave_interval_secs: Some(30),
            document_id: "plan".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn move_debounce(&self) -> Duration {
        Duration::from_millis(self.move_debounce_ms)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_millis(self.history_interval_ms)
    }

    pub fn save_interval(&self) -> Duration {
        Duration::from_millis(self.save_interval_ms)
    }

    pub fn message_lifetime(&self) -> Duration {
        Duration::from_millis(self.message_lifetime_ms)
    }

    pub fn autosave_interval(&self) -> Option<Duration> {
        self.autosave_interval_secs.map(Duration::from_secs)
    }
}
