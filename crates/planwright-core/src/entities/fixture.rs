//! Windows and doors: rectangles that attach to walls.

use super::{EntityId, EntityTrait, Layer, WallLocator};
use crate::geometry::{Bounds, Vertex};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureKind {
    /// Attaches to exterior walls only.
    Window,
    /// Attaches to any wall.
    Door,
}

/// A window or door occupying an axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub(crate) id: EntityId,
    pub kind: FixtureKind,
    pub rect: Bounds,
    #[serde(default)]
    pub layer: Layer,
    #[serde(skip)]
    pub selected: bool,
}

impl Fixture {
    /// Length of a window along its wall.
    pub const WINDOW_LENGTH: i64 = 36;
    /// Depth of a window across its wall.
    pub const WINDOW_WIDTH: i64 = 6;
    /// Length of a door along its wall. Its depth is the wall thickness.
    pub const DOOR_LENGTH: i64 = 36;

    pub fn new(kind: FixtureKind, rect: Bounds) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            rect,
            layer: 0,
            selected: false,
        }
    }

    /// Window centered on `center`.
    pub fn window(center: Vertex, horizontal: bool) -> Self {
        Self::new(
            FixtureKind::Window,
            centered(center, horizontal, Self::WINDOW_LENGTH, Self::WINDOW_WIDTH),
        )
    }

    /// Door centered on `center`, as deep as the wall it sits in.
    pub fn door(center: Vertex, horizontal: bool, thickness: i64) -> Self {
        Self::new(
            FixtureKind::Door,
            centered(center, horizontal, Self::DOOR_LENGTH, thickness),
        )
    }

    /// Orientation, derived from the rectangle shape.
    pub fn is_horizontal(&self) -> bool {
        self.rect.w >= self.rect.h
    }

    pub fn exterior_only(&self) -> bool {
        self.kind == FixtureKind::Window
    }

    /// Snap onto the nearest compatible wall around `location`. Without a
    /// wall in range the fixture stays where it is.
    pub fn adjust(&mut self, walls: &dyn WallLocator, location: Vertex) {
        let Some(hit) = walls.nearest_wall(location, self.exterior_only()) else {
            return;
        };

        let horizontal = hit.wall.is_horizontal();
        self.rect = match self.kind {
            FixtureKind::Window => {
                centered(hit.point, horizontal, Self::WINDOW_LENGTH, Self::WINDOW_WIDTH)
            }
            FixtureKind::Door => centered(
                hit.point,
                horizontal,
                Self::DOOR_LENGTH,
                hit.wall.thickness().width(),
            ),
        };
    }
}

/// Rectangle of `length` along the axis and `depth` across it, centered on
/// `center`.
fn centered(center: Vertex, horizontal: bool, length: i64, depth: i64) -> Bounds {
    if horizontal {
        Bounds::new(center.x - length / 2, center.y - depth / 2, length, depth)
    } else {
        Bounds::new(center.x - depth / 2, center.y - length / 2, depth, length)
    }
}

impl EntityTrait for Fixture {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        self.rect
    }

    fn hit_point(&self, point: Point) -> bool {
        self.rect.contains(point)
    }

    fn hit_rect(&self, rect: &Bounds) -> bool {
        self.rect.overlaps(rect)
    }

    /// `use_start` places the top-left corner, otherwise the bottom-right.
    fn move_to(&mut self, target: Vertex, use_start: bool) {
        if use_start {
            self.rect.x = target.x;
            self.rect.y = target.y;
        } else {
            self.rect.x = target.x - self.rect.w;
            self.rect.y = target.y - self.rect.h;
        }
    }

    /// Midpoint of the leading or trailing short edge.
    fn moving_vertex(&self, use_start: bool) -> Vertex {
        let Bounds { x, y, w, h } = self.rect;
        match (self.is_horizontal(), use_start) {
            (true, true) => Vertex::new(x, y + h / 2),
            (true, false) => Vertex::new(x + w, y + h / 2),
            (false, true) => Vertex::new(x + w / 2, y),
            (false, false) => Vertex::new(x + w / 2, y + h),
        }
    }

    fn describe(&self) -> String {
        match self.kind {
            FixtureKind::Window => "Window".to_string(),
            FixtureKind::Door => "Door".to_string(),
        }
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
