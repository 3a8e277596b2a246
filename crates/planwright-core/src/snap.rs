//! Pointer snapping: existing vertices first, then a shared axis, then the grid.

use crate::geometry::Vertex;
use crate::model::PlanModel;
use kurbo::Point;

/// Default grid spacing the pointer snaps to.
pub const DEFAULT_SNAP_INTERVAL: i64 = 6;

/// Default maximum distance for snapping to an existing vertex.
pub const DEFAULT_VERTEX_SNAP_RANGE: f64 = 6.0;

/// Snap a single coordinate to the nearest multiple of `interval`.
pub fn snap_to_grid(value: f64, interval: i64) -> i64 {
    if interval <= 0 {
        return value.round() as i64;
    }
    interval * (value / interval as f64).round() as i64
}

/// Axis a two-point placement is constrained to while SHIFT is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

impl AxisLock {
    /// Pick the axis for a line from `first` towards `pointer`: under 45
    /// degrees from horizontal locks horizontally, anything steeper locks
    /// vertically. A pointer directly above or below `first` stays free.
    pub fn from_points(first: Vertex, pointer: Vertex) -> Self {
        let dx = (first.x - pointer.x) as f64;
        let dy = (first.y - pointer.y) as f64;
        if dx == 0.0 {
            return AxisLock::Free;
        }
        let angle = (dy / dx).atan().to_degrees();
        if angle.abs() < 45.0 {
            AxisLock::Horizontal
        } else {
            AxisLock::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == AxisLock::Horizontal
    }

    pub fn is_vertical(self) -> bool {
        self == AxisLock::Vertical
    }

    /// Project `pointer` onto the locked axis through `first`.
    pub fn constrain(self, first: Vertex, pointer: Vertex) -> Vertex {
        match self {
            AxisLock::Free => pointer,
            AxisLock::Horizontal => Vertex::new(pointer.x, first.y),
            AxisLock::Vertical => Vertex::new(first.x, pointer.y),
        }
    }
}

/// What the pointer snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    /// An existing segment endpoint.
    Vertex(Vertex),
    /// A vertex sharing one coordinate with the pointer.
    Axis(Vertex),
    Grid,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Vertex,
    pub target: SnapTarget,
}

impl SnapResult {
    pub fn vertex(&self) -> Option<Vertex> {
        match self.target {
            SnapTarget::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn axis(&self) -> Option<Vertex> {
        match self.target {
            SnapTarget::Axis(v) => Some(v),
            _ => None,
        }
    }
}

/// Snap settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    pub interval: i64,
    pub vertex_range: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SNAP_INTERVAL,
            vertex_range: DEFAULT_VERTEX_SNAP_RANGE,
        }
    }
}

/// Adjust a model-space pointer position.
///
/// `placing` carries the current axis lock while a two-point placement is
/// in progress; axis snapping only applies then. A vertex hit returns the
/// vertex's exact coordinates, an axis hit takes the axis vertex's
/// coordinate and grid-snaps the free one.
pub fn snap_pointer(
    model: &PlanModel,
    world: Point,
    placing: Option<AxisLock>,
    settings: SnapSettings,
) -> SnapResult {
    let origin = Vertex::round(world);

    if let Some(vertex) = model.nearest_vertex_within_range(origin, settings.vertex_range) {
        return SnapResult {
            point: vertex,
            target: SnapTarget::Vertex(vertex),
        };
    }

    if let Some(lock) = placing {
        let horizontal = lock.is_horizontal();
        if let Some(axis) = model.nearest_vertex_on_axis(origin, horizontal) {
            let point = if horizontal {
                Vertex::new(
                    snap_to_grid(axis.x as f64, settings.interval),
                    snap_to_grid(world.y, settings.interval),
                )
            } else {
                Vertex::new(
                    snap_to_grid(world.x, settings.interval),
                    snap_to_grid(axis.y as f64, settings.interval),
                )
            };
            return SnapResult {
                point,
                target: SnapTarget::Axis(axis),
            };
        }
    }

    SnapResult {
        point: Vertex::new(
            snap_to_grid(world.x, settings.interval),
            snap_to_grid(world.y, settings.interval),
        ),
        target: SnapTarget::Grid,
    }
}
