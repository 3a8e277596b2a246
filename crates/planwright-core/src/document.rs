//! Persistable snapshot of a plan's entity collections.

use crate::entities::{Fixture, Label, Segment};
use serde::{Deserialize, Serialize};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// The four entity collections of a plan, as stored on disk.
///
/// Selection flags are not persisted; derived state (vertices, gap patches,
/// segment lengths) is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub windows: Vec<Fixture>,
    #[serde(default)]
    pub doors: Vec<Fixture>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for PlanDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            segments: Vec::new(),
            windows: Vec::new(),
            doors: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl PlanDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn entity_count(&self) -> usize {
        self.segments.len() + self.windows.len() + self.doors.len() + self.labels.len()
    }
}
