//! Planwright Core Library
//!
//! Platform-agnostic entity model, spatial queries and tool state machine
//! for the Planwright floor-plan editor. Shells feed input through
//! [`Editor::handle_input`] and render from [`Editor::snapshot`].

pub mod camera;
pub mod config;
pub mod document;
pub mod editor;
pub mod entities;
pub mod geometry;
pub mod history;
pub mod housekeeping;
pub mod input;
pub mod model;
pub mod query;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod units;

pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use document::PlanDocument;
pub use editor::{Editor, EditorError, EditorSnapshot, Preview, ShellCommand};
pub use entities::{Entity, EntityId, EntityKind, EntityTrait, Fixture, FixtureKind, Label, Layer, Segment, SegmentKind};
pub use geometry::{Bounds, Vertex};
pub use history::{Action, ActionLog, HistoryError};
pub use input::{InputEvent, Key, KeyState, MouseButton};
pub use model::{GapPatch, ModelEvent, PlanModel};
pub use snap::{AxisLock, SnapResult, SnapTarget, snap_pointer, snap_to_grid};
pub use storage::{Storage, StorageError};
pub use tools::{ToolKind, ToolState};
