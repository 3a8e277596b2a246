//! Tool palette and the tool state machine's states.

use crate::entities::{Fixture, FixtureKind, Layer, SegmentKind};
use crate::geometry::{Bounds, Vertex};
use crate::snap::AxisLock;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Erase,
    /// Free line.
    Draw,
    Move,
    Measure,
    AddText,
    Pan,
    Zoom,
    Grid,
    Layer(Layer),
    Undo,
    Redo,
    Save,
    Load,
    ExportInventory,
    Export,
    Exit,
    ExteriorWall,
    InteriorWall,
    Window,
    Door,
}

impl ToolKind {
    /// Segment kind placed by a two-point tool.
    pub fn segment_kind(self) -> Option<SegmentKind> {
        match self {
            ToolKind::Draw => Some(SegmentKind::Line),
            ToolKind::Measure => Some(SegmentKind::Measurement),
            ToolKind::ExteriorWall => Some(SegmentKind::ExteriorWall),
            ToolKind::InteriorWall => Some(SegmentKind::InteriorWall),
            _ => None,
        }
    }

    /// Fixture kind placed by a one-point tool.
    pub fn fixture_kind(self) -> Option<FixtureKind> {
        match self {
            ToolKind::Window => Some(FixtureKind::Window),
            ToolKind::Door => Some(FixtureKind::Door),
            _ => None,
        }
    }

    /// Tools that run once on activation and leave the editor idle.
    pub fn is_single_shot(self) -> bool {
        matches!(
            self,
            ToolKind::Grid
                | ToolKind::Layer(_)
                | ToolKind::Undo
                | ToolKind::Redo
                | ToolKind::Save
                | ToolKind::ExportInventory
                | ToolKind::Export
                | ToolKind::Exit
        )
    }
}

/// Tool a drag-select returns to on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Select,
    Move,
    Erase,
}

impl SelectMode {
    /// State the editor rests in for this mode.
    pub fn resting_state(self) -> ToolState {
        match self {
            SelectMode::Select => ToolState::Idle,
            SelectMode::Move => ToolState::Moving,
            SelectMode::Erase => ToolState::Erasing,
        }
    }
}

/// State of the tool state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for input; presses select.
    #[default]
    Idle,
    /// Pointer drag is sweeping a selection rectangle.
    DragSelecting {
        mode: SelectMode,
        start: Vertex,
        rect: Bounds,
    },
    /// Selected entity follows the next press.
    Moving,
    /// Every selection is deleted immediately.
    Erasing,
    PlacingFirstPoint { kind: SegmentKind },
    PlacingSecondPoint {
        kind: SegmentKind,
        first: Vertex,
        /// Projected second point.
        end: Vertex,
        lock: AxisLock,
    },
    PlacingOnePoint {
        kind: FixtureKind,
        /// Fixture a commit would create, when a wall is in range.
        preview: Option<Fixture>,
    },
    /// Typed text accumulates until ENTER places it.
    AddingText,
    /// Plain drags pan the camera.
    Panning,
    /// Hint-only state for wheel zoom.
    Zooming,
    /// Waiting for a plan file to be dropped.
    Loading,
}

impl ToolState {
    /// Initial state of a multi-tick tool. `None` for single-shot tools.
    pub fn for_tool(tool: ToolKind) -> Option<ToolState> {
        if let Some(kind) = tool.segment_kind() {
            return Some(ToolState::PlacingFirstPoint { kind });
        }
        if let Some(kind) = tool.fixture_kind() {
            return Some(ToolState::PlacingOnePoint {
                kind,
                preview: None,
            });
        }
        match tool {
            ToolKind::Select => Some(ToolState::Idle),
            ToolKind::Erase => Some(ToolState::Erasing),
            ToolKind::Move => Some(ToolState::Moving),
            ToolKind::AddText => Some(ToolState::AddingText),
            ToolKind::Pan => Some(ToolState::Panning),
            ToolKind::Zoom => Some(ToolState::Zooming),
            ToolKind::Load => Some(ToolState::Loading),
            _ => None,
        }
    }

    /// Which selection tool presses feed in this state, if any.
    pub fn select_mode(&self) -> Option<SelectMode> {
        match self {
            ToolState::Idle => Some(SelectMode::Select),
            ToolState::Moving => Some(SelectMode::Move),
            ToolState::Erasing => Some(SelectMode::Erase),
            ToolState::DragSelecting { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// True while a two-point placement is in progress.
    pub fn is_placing_two_points(&self) -> bool {
        matches!(
            self,
            ToolState::PlacingFirstPoint { .. } | ToolState::PlacingSecondPoint { .. }
        )
    }

    /// Hint shown at the top of the canvas.
    pub fn hint(&self) -> &'static str {
        match self {
            ToolState::Idle | ToolState::DragSelecting { .. } => "",
            ToolState::Moving => {
                "Select an entity and click on a new vertex location. Toggle between vertices with TAB."
            }
            ToolState::Erasing => "Select entities to erase.",
            ToolState::PlacingFirstPoint { .. } | ToolState::PlacingSecondPoint { .. } => {
                "Select starting and ending point. Press ESC to cancel placement. Hold SHIFT to align line to axis"
            }
            ToolState::PlacingOnePoint { .. } => {
                "Move the cursor onto a wall and click to place. Press ESC to cancel placement."
            }
            ToolState::AddingText => "Move cursor to text location, type text, and press ENTER.",
            ToolState::Panning => "Press and drag to pan the camera.",
            ToolState::Zooming => "Scroll mouse wheel to zoom the camera.",
            ToolState::Loading => "Drag and drop a plan file onto the window to load it.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tool() {
        assert_eq!(
            ToolState::for_tool(ToolKind::ExteriorWall),
            Some(ToolState::PlacingFirstPoint {
                kind: SegmentKind::ExteriorWall
            })
        );
        assert_eq!(
            ToolState::for_tool(ToolKind::Door),
            Some(ToolState::PlacingOnePoint {
                kind: FixtureKind::Door,
                preview: None,
            })
        );
        assert_eq!(ToolState::for_tool(ToolKind::Erase), Some(ToolState::Erasing));
        assert_eq!(ToolState::for_tool(ToolKind::Undo), None);
        assert_eq!(ToolState::for_tool(ToolKind::Layer(2)), None);
    }

    #[test]
    fn test_every_tool_is_single_shot_or_stateful() {
        let tools = [
            ToolKind::Select,
            ToolKind::Erase,
            ToolKind::Draw,
            ToolKind::Move,
            ToolKind::Measure,
            ToolKind::AddText,
            ToolKind::Pan,
            ToolKind::Zoom,
            ToolKind::Grid,
            ToolKind::Layer(0),
            ToolKind::Undo,
            ToolKind::Redo,
            ToolKind::Save,
            ToolKind::Load,
            ToolKind::ExportInventory,
            ToolKind::Export,
            ToolKind::Exit,
            ToolKind::ExteriorWall,
            ToolKind::InteriorWall,
            ToolKind::Window,
            ToolKind::Door,
        ];
        for tool in tools {
            assert_ne!(tool.is_single_shot(), ToolState::for_tool(tool).is_some(), "{:?}", tool);
        }
    }

    #[test]
    fn test_select_mode_round_trip() {
        for mode in [SelectMode::Select, SelectMode::Move, SelectMode::Erase] {
            assert_eq!(mode.resting_state().select_mode(), Some(mode));
        }
        assert_eq!(ToolState::AddingText.select_mode(), None);
    }
}
