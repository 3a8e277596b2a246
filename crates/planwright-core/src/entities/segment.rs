//! Straight walls and lines.

use super::{EntityId, EntityTrait, Layer, SerializableColor};
use crate::geometry::{self, Bounds, Vertex};
use crate::units::format_feet_inches;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Nominal width class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Thickness {
    ExteriorWall,
    InteriorWall,
    RegularLine,
}

impl Thickness {
    /// Width in model units.
    pub const fn width(self) -> i64 {
        match self {
            Thickness::ExteriorWall => 6,
            Thickness::InteriorWall => 4,
            Thickness::RegularLine => 1,
        }
    }
}

/// What a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    ExteriorWall,
    InteriorWall,
    /// Free-form drawing line.
    Line,
    /// Transient ruler shown by the measure tool.
    Measurement,
}

impl SegmentKind {
    pub const fn thickness(self) -> Thickness {
        match self {
            SegmentKind::ExteriorWall => Thickness::ExteriorWall,
            SegmentKind::InteriorWall => Thickness::InteriorWall,
            SegmentKind::Line | SegmentKind::Measurement => Thickness::RegularLine,
        }
    }

    /// Name used in descriptions.
    pub const fn name(self) -> &'static str {
        match self {
            SegmentKind::ExteriorWall => "Exterior Wall",
            SegmentKind::InteriorWall => "Interior Wall",
            SegmentKind::Line => "Line",
            SegmentKind::Measurement => "Measurement",
        }
    }

    /// Walls carry fixtures and appear in the inventory.
    pub const fn is_wall(self) -> bool {
        matches!(self, SegmentKind::ExteriorWall | SegmentKind::InteriorWall)
    }
}

/// A straight segment between two vertices.
///
/// The length is computed once at construction. Moving produces a new
/// segment value with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SegmentData")]
pub struct Segment {
    id: EntityId,
    start: Vertex,
    end: Vertex,
    kind: SegmentKind,
    length: f64,
    /// Display color when not selected.
    pub color: SerializableColor,
    pub layer: Layer,
    #[serde(skip)]
    pub selected: bool,
}

/// Persisted form of a segment; the length is derived again on load.
#[derive(Deserialize)]
struct SegmentData {
    id: EntityId,
    start: Vertex,
    end: Vertex,
    kind: SegmentKind,
    #[serde(default)]
    color: SerializableColor,
    #[serde(default)]
    layer: Layer,
}

impl From<SegmentData> for Segment {
    fn from(data: SegmentData) -> Self {
        let mut segment = Segment::reconstruct(data.id, data.kind, data.start, data.end);
        segment.color = data.color;
        segment.layer = data.layer;
        segment
    }
}

impl Segment {
    /// Create a new segment with a fresh id.
    pub fn new(kind: SegmentKind, start: Vertex, end: Vertex) -> Self {
        Self::reconstruct(Uuid::new_v4(), kind, start, end)
    }

    /// Build a segment with a specific id.
    pub(crate) fn reconstruct(id: EntityId, kind: SegmentKind, start: Vertex, end: Vertex) -> Self {
        Self {
            id,
            start,
            end,
            kind,
            length: geometry::distance(start.to_point(), end.to_point()),
            color: SerializableColor::black(),
            layer: 0,
            selected: false,
        }
    }

    pub fn start(&self) -> Vertex {
        self.start
    }

    pub fn end(&self) -> Vertex {
        self.end
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn thickness(&self) -> Thickness {
        self.kind.thickness()
    }

    /// Euclidean length, fixed at construction.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Whether the segment runs toward increasing x, or toward increasing y
    /// when vertical.
    pub fn is_positive(&self) -> bool {
        self.end.x > self.start.x || (self.end.x == self.start.x && self.end.y > self.start.y)
    }

    /// Color to draw with, accounting for selection.
    pub fn display_color(&self) -> SerializableColor {
        if self.selected {
            SerializableColor::selection()
        } else {
            self.color
        }
    }

    /// Copy translated so the pivot endpoint lands on `target`.
    pub fn moved(&self, target: Vertex, use_start: bool) -> Segment {
        let pivot = if use_start { self.start } else { self.end };
        let dx = target.x - pivot.x;
        let dy = target.y - pivot.y;

        let mut moved = Segment::reconstruct(
            self.id,
            self.kind,
            self.start.offset(dx, dy),
            self.end.offset(dx, dy),
        );
        moved.color = self.color;
        moved.layer = self.layer;
        moved.selected = self.selected;
        moved
    }
}

impl EntityTrait for Segment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.start, self.end)
    }

    fn hit_point(&self, point: Point) -> bool {
        geometry::point_on_segment(point, self.start.to_point(), self.end.to_point())
    }

    fn hit_rect(&self, rect: &Bounds) -> bool {
        let (a, b) = (self.start.to_point(), self.end.to_point());
        // Fully enclosed segments cross no edge.
        rect.contains(a) || rect.contains(b) || geometry::rect_intersects_segment(rect, a, b)
    }

    fn move_to(&mut self, target: Vertex, use_start: bool) {
        *self = self.moved(target, use_start);
    }

    fn moving_vertex(&self, use_start: bool) -> Vertex {
        if use_start { self.start } else { self.end }
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.kind.name(), format_feet_inches(self.length))
    }

    fn layer(&self) -> Layer {
        self.layer
    }

    fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
