//! User text placed on the plan.

use super::{EntityId, EntityTrait, Layer};
use crate::geometry::{Bounds, Vertex};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub(crate) id: EntityId,
    pub text: String,
    pub position: Vertex,
    #[serde(default)]
    pub layer: Layer,
    #[serde(skip)]
    pub selected: bool,
}

impl Label {
    /// Width of one character cell.
    pub const GLYPH_WIDTH: i64 = 8;
    /// Height of a line of text.
    pub const GLYPH_HEIGHT: i64 = 16;

    pub fn new(text: impl Into<String>, position: Vertex) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            position,
            layer: 0,
            selected: false,
        }
    }
}

impl EntityTrait for Label {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        let chars = self.text.chars().count() as i64;
        Bounds::new(
            self.position.x,
            self.position.y,
            chars * Self::GLYPH_WIDTH,
            Self::GLYPH_HEIGHT,
        )
    }

    /// Labels are only picked by rectangle selection.
    fn hit_point(&self, _point: Point) -> bool {
        false
    }

    fn hit_rect(&self, rect: &Bounds) -> bool {
        self.bounds().overlaps(rect)
    }

    fn move_to(&mut self, target: Vertex, _use_start: bool) {
        self.position = target;
    }

    fn moving_vertex(&self, _use_start: bool) -> Vertex {
        self.position
    }

    fn describe(&self) -> String {
        format!("Text ({})", self.text)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_text() {
        let label = Label::new("Bath", Vertex::new(10, 20));
        assert_eq!(label.bounds(), Bounds::new(10, 20, 32, 16));
    }

    #[test]
    fn test_rect_hit_only() {
        let label = Label::new("Bath", Vertex::new(10, 20));
        assert!(!label.hit_point(Point::new(12.0, 22.0)));
        assert!(label.hit_rect(&Bounds::new(0, 0, 15, 25)));
        assert!(!label.hit_rect(&Bounds::new(0, 0, 10, 20)));
    }

    #[test]
    fn test_move() {
        let mut label = Label::new("Hall", Vertex::new(0, 0));
        label.move_to(Vertex::new(-6, 12), false);
        assert_eq!(label.position, Vertex::new(-6, 12));
        assert_eq!(label.moving_vertex(true), Vertex::new(-6, 12));
        assert_eq!(label.describe(), "Text (Hall)");
    }
}
