//! Drawable entities of a floor plan.

mod fixture;
mod label;
mod segment;

pub use fixture::{Fixture, FixtureKind};
pub use label::Label;
pub use segment::{Segment, SegmentKind, Thickness};

use crate::geometry::{Bounds, Vertex};
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Index of the drawing layer an entity lives on.
pub type Layer = u8;

/// Serializable color representation (RGB8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Highlight used for selected entities.
    pub const fn selection() -> Self {
        Self::new(34, 139, 34)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgb8(color.r, color.g, color.b)
    }
}

/// Discriminant of an [`Entity`], used to pick a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Segment,
    Window,
    Door,
    Label,
}

/// A wall found by a nearest-wall query, with the point on it closest to
/// the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct WallHit {
    pub wall: Segment,
    pub point: Vertex,
}

/// Lookup used by fixtures to re-attach themselves after a move.
pub trait WallLocator {
    /// Nearest axis-aligned wall to `point` within the attach distance.
    fn nearest_wall(&self, point: Vertex, exterior_only: bool) -> Option<WallHit>;
}

/// Capabilities shared by every entity type.
pub trait EntityTrait {
    /// Get the unique identifier.
    fn id(&self) -> EntityId;

    /// Axis-aligned bounding box in model coordinates.
    fn bounds(&self) -> Bounds;

    /// Check if a model-space point hits this entity.
    fn hit_point(&self, point: Point) -> bool;

    /// Check if this entity collides with a rectangle.
    fn hit_rect(&self, rect: &Bounds) -> bool;

    /// Move so that the chosen reference vertex lands on `target`.
    fn move_to(&mut self, target: Vertex, use_start: bool);

    /// The reference vertex `move_to` would place.
    fn moving_vertex(&self, use_start: bool) -> Vertex;

    /// Short user-facing description.
    fn describe(&self) -> String;

    fn layer(&self) -> Layer;

    fn set_layer(&mut self, layer: Layer);

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);
}

/// Closed set of entity types, stored by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Segment(Segment),
    Fixture(Fixture),
    Label(Label),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Segment(_) => EntityKind::Segment,
            Entity::Fixture(f) => match f.kind {
                FixtureKind::Window => EntityKind::Window,
                FixtureKind::Door => EntityKind::Door,
            },
            Entity::Label(_) => EntityKind::Label,
        }
    }

    fn as_trait(&self) -> &dyn EntityTrait {
        match self {
            Entity::Segment(s) => s,
            Entity::Fixture(f) => f,
            Entity::Label(l) => l,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn EntityTrait {
        match self {
            Entity::Segment(s) => s,
            Entity::Fixture(f) => f,
            Entity::Label(l) => l,
        }
    }

    pub fn id(&self) -> EntityId {
        self.as_trait().id()
    }

    pub fn bounds(&self) -> Bounds {
        self.as_trait().bounds()
    }

    pub fn hit_point(&self, point: Point) -> bool {
        self.as_trait().hit_point(point)
    }

    pub fn hit_rect(&self, rect: &Bounds) -> bool {
        self.as_trait().hit_rect(rect)
    }

    pub fn move_to(&mut self, target: Vertex, use_start: bool) {
        self.as_trait_mut().move_to(target, use_start);
    }

    pub fn moving_vertex(&self, use_start: bool) -> Vertex {
        self.as_trait().moving_vertex(use_start)
    }

    /// Re-attach after a move. Only fixtures react; they snap onto the
    /// nearest compatible wall or stay where they were moved.
    pub fn adjust_after_move(&mut self, walls: &dyn WallLocator, location: Vertex) {
        if let Entity::Fixture(f) = self {
            f.adjust(walls, location);
        }
    }

    pub fn describe(&self) -> String {
        self.as_trait().describe()
    }

    pub fn layer(&self) -> Layer {
        self.as_trait().layer()
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.as_trait_mut().set_layer(layer);
    }

    pub fn is_selected(&self) -> bool {
        self.as_trait().is_selected()
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.as_trait_mut().set_selected(selected);
    }
}

impl From<Segment> for Entity {
    fn from(s: Segment) -> Self {
        Entity::Segment(s)
    }
}

impl From<Fixture> for Entity {
    fn from(f: Fixture) -> Self {
        Entity::Fixture(f)
    }
}

impl From<Label> for Entity {
    fn from(l: Label) -> Self {
        Entity::Label(l)
    }
}
