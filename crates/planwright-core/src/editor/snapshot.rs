//! Read-only view of editor state handed to renderers each tick.

use crate::entities::{Fixture, Label, Layer, Segment};
use crate::geometry::{Bounds, Vertex};
use crate::model::GapPatch;
use kurbo::Affine;

/// Line being placed: first point, projected second point and thickness.
///
/// `(0,0)-(0,0)` with thickness 0 means no placement is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preview {
    pub start: Vertex,
    pub end: Vertex,
    pub thickness: i64,
}

impl Preview {
    pub const NONE: Preview = Preview {
        start: Vertex::ORIGIN,
        end: Vertex::ORIGIN,
        thickness: 0,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub segments: Vec<Segment>,
    pub windows: Vec<Fixture>,
    pub doors: Vec<Fixture>,
    pub labels: Vec<Label>,
    pub gap_patches: Vec<GapPatch>,
    /// World to screen transform.
    pub transform: Affine,
    pub preview: Preview,
    /// Fixture a one-point placement would create.
    pub fixture_preview: Option<Fixture>,
    pub selection_rect: Option<Bounds>,
    /// Vertex the pointer snapped to during two-point placement.
    pub snapped_vertex: Option<Vertex>,
    /// Axis vertex the pointer aligned with during two-point placement.
    pub snapped_axis: Option<Vertex>,
    /// Reference vertex of the entity being moved.
    pub moving_vertex: Option<Vertex>,
    pub show_grid: bool,
    pub layer: Layer,
    pub messages: Vec<String>,
    pub hint: String,
    pub info: String,
    pub status: String,
}
