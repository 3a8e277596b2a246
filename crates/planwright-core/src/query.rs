//! Spatial queries over a [`PlanModel`]: snapping targets and hit-testing.

use crate::entities::{Entity, EntityTrait, SegmentKind, WallHit, WallLocator};
use crate::geometry::{self, Bounds, Vertex};
use crate::model::PlanModel;
use kurbo::Point;

impl PlanModel {
    /// Nearest vertex to `origin` no further than `range`.
    ///
    /// Vertices are visited in lexicographic order and only a strictly
    /// closer vertex replaces the current best, so among equidistant
    /// vertices the lexicographically smallest wins.
    pub fn nearest_vertex_within_range(&self, origin: Vertex, range: f64) -> Option<Vertex> {
        let origin = origin.to_point();
        let mut best: Option<(Vertex, f64)> = None;

        for vertex in self.vertices() {
            let d = geometry::distance(vertex.to_point(), origin);
            if d > range {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((vertex, d));
            }
        }
        best.map(|(v, _)| v)
    }

    /// Nearest vertex sharing `origin`'s x coordinate when `horizontal`,
    /// otherwise its y coordinate.
    pub fn nearest_vertex_on_axis(&self, origin: Vertex, horizontal: bool) -> Option<Vertex> {
        let from = origin.to_point();
        let mut best: Option<(Vertex, f64)> = None;

        for vertex in self.vertices() {
            let aligned = if horizontal {
                vertex.x == origin.x
            } else {
                vertex.y == origin.y
            };
            if !aligned {
                continue;
            }
            let d = geometry::distance(vertex.to_point(), from);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((vertex, d));
            }
        }
        best.map(|(v, _)| v)
    }

    /// First entity under `point`, searching doors, windows, then segments.
    ///
    /// Leaves exactly the returned entity selected and every other entity
    /// deselected.
    pub fn entity_at_point(&self, point: Point) -> Option<Entity> {
        let hit = self.peek_entity_at_point(point);
        let ids: Vec<_> = hit.iter().map(Entity::id).collect();
        self.select_only(&ids);
        hit.map(|mut e| {
            e.set_selected(true);
            e
        })
    }

    /// Like [`entity_at_point`](Self::entity_at_point) without touching
    /// selection flags.
    pub fn peek_entity_at_point(&self, point: Point) -> Option<Entity> {
        self.doors()
            .into_iter()
            .find(|d| d.hit_point(point))
            .map(Entity::Fixture)
            .or_else(|| {
                self.windows()
                    .into_iter()
                    .find(|w| w.hit_point(point))
                    .map(Entity::Fixture)
            })
            .or_else(|| {
                self.segments()
                    .into_iter()
                    .find(|s| s.hit_point(point))
                    .map(Entity::Segment)
            })
    }

    /// Every entity colliding with `rect`. Leaves exactly those entities
    /// selected.
    pub fn entities_in_rect(&self, rect: &Bounds) -> Vec<Entity> {
        let hits: Vec<Entity> = self
            .entities()
            .into_iter()
            .filter(|e| e.hit_rect(rect))
            .map(|mut e| {
                e.set_selected(true);
                e
            })
            .collect();

        let ids: Vec<_> = hits.iter().map(Entity::id).collect();
        self.select_only(&ids);
        hits
    }
}

impl WallLocator for PlanModel {
    /// Walls considered: exterior walls only when `exterior_only`, otherwise
    /// any wall; free lines never. Diagonal walls are skipped. The projected
    /// point keeps the query point's free coordinate and takes the wall's fixed
    /// one.
    fn nearest_wall(&self, point: Vertex, exterior_only: bool) -> Option<WallHit> {
        let from = point.to_point();
        let mut best: Option<(WallHit, f64)> = None;

        for wall in self.segments() {
            let eligible = if exterior_only {
                wall.kind() == SegmentKind::ExteriorWall
            } else {
                wall.kind().is_wall()
            };
            if !eligible {
                continue;
            }

            let projected = if wall.is_horizontal() {
                Vertex::new(point.x, wall.start().y)
            } else if wall.is_vertical() {
                Vertex::new(wall.start().x, point.y)
            } else {
                continue;
            };

            let d = geometry::distance(projected.to_point(), from);
            if best.as_ref().is_none_or(|(_, best_d)| d < *best_d) {
                best = Some((WallHit { wall, point: projected }, d));
            }
        }

        match best {
            Some((hit, d)) if d <= self.attach_distance => Some(hit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Entity, FixtureKind};

    fn v(x: i64, y: i64) -> Vertex {
        Vertex::new(x, y)
    }

    fn model_with_vertices(points: &[(i64, i64)]) -> PlanModel {
        let model = PlanModel::new();
        for &(x, y) in points {
            model.add_segment(SegmentKind::Line, v(x, y), v(x, y), 0);
        }
        model
    }

    #[test]
    fn test_nearest_vertex_within_range() {
        let model = model_with_vertices(&[(0, 9), (0, 12), (5, 2)]);
        assert_eq!(model.nearest_vertex_within_range(v(0, 10), 6.0), Some(v(0, 9)));
    }

    #[test]
    fn test_nearest_vertex_out_of_range() {
        let model = model_with_vertices(&[(0, 9), (0, 12), (5, 2)]);
        assert_eq!(model.nearest_vertex_within_range(v(100, 100), 6.0), None);
        assert_eq!(model.nearest_vertex_within_range(v(0, 20), 6.0), None);
    }

    #[test]
    fn test_nearest_vertex_tie_is_lexicographic() {
        let model = model_with_vertices(&[(2, 0), (0, 2), (-2, 0)]);
        assert_eq!(model.nearest_vertex_within_range(v(0, 0), 6.0), Some(v(-2, 0)));
    }

    #[test]
    fn test_nearest_vertex_on_axis() {
        let model = model_with_vertices(&[(0, 10), (50, 10)]);
        assert_eq!(model.nearest_vertex_on_axis(v(20, 10), false), Some(v(0, 10)));
        assert_eq!(model.nearest_vertex_on_axis(v(40, 10), false), Some(v(50, 10)));
        assert_eq!(model.nearest_vertex_on_axis(v(50, 90), true), Some(v(50, 10)));
        assert_eq!(model.nearest_vertex_on_axis(v(20, 11), false), None);
    }

    #[test]
    fn test_nearest_wall_projection() {
        let model = PlanModel::new();
        model.add_segment(SegmentKind::ExteriorWall, v(0, 3), v(360, 3), 0);
        model.add_segment(SegmentKind::InteriorWall, v(0, 50), v(360, 50), 0);

        let hit = model.nearest_wall(v(198, 6), true).unwrap();
        assert_eq!(hit.point, v(198, 3));
        assert_eq!(hit.wall.kind(), SegmentKind::ExteriorWall);

        let hit = model.nearest_wall(v(198, 45), false).unwrap();
        assert_eq!(hit.point, v(198, 50));

        // Windows ignore interior walls even when closer.
        let hit = model.nearest_wall(v(198, 45), true).unwrap();
        assert_eq!(hit.point, v(198, 3));
    }

    #[test]
    fn test_nearest_wall_skips_lines_and_diagonals() {
        let model = PlanModel::new();
        model.add_segment(SegmentKind::Line, v(0, 0), v(100, 0), 0);
        model.add_segment(SegmentKind::ExteriorWall, v(0, 0), v(100, 100), 0);
        assert!(model.nearest_wall(v(50, 2), false).is_none());
    }

    #[test]
    fn test_nearest_wall_distance_cutoff() {
        let model = PlanModel::new();
        model.add_segment(SegmentKind::ExteriorWall, v(0, 0), v(0, 500), 0);
        assert!(model.nearest_wall(v(100, 10), false).is_some());
        assert!(model.nearest_wall(v(101, 10), false).is_none());
    }

    #[test]
    fn test_entity_at_point_prefers_fixtures() {
        let model = PlanModel::new();
        let wall = model.add_segment(SegmentKind::ExteriorWall, v(0, 0), v(0, 144), 0);
        let door = model.add_door(v(0, 84), false, 6, 0);

        let hit = model.entity_at_point(Point::new(0.0, 84.0)).unwrap();
        assert_eq!(hit.id(), door.id());
        assert!(hit.is_selected());
        assert!(model.doors()[0].selected);
        assert!(!model.segments()[0].selected);

        let hit = model.entity_at_point(Point::new(0.0, 10.0)).unwrap();
        assert_eq!(hit.id(), wall.id());
        assert!(!model.doors()[0].selected);
        assert!(model.segments()[0].selected);
    }

    #[test]
    fn test_entity_at_point_miss_clears_selection() {
        let model = PlanModel::new();
        model.add_segment(SegmentKind::Line, v(0, 0), v(10, 0), 0);
        model.entity_at_point(Point::new(5.0, 0.0));
        assert!(model.segments()[0].selected);

        assert!(model.entity_at_point(Point::new(50.0, 50.0)).is_none());
        assert!(!model.segments()[0].selected);
    }

    #[test]
    fn test_labels_are_not_point_hit() {
        let model = PlanModel::new();
        model.add_label("Office", v(0, 0), 0);
        assert!(model.entity_at_point(Point::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn test_entities_in_rect_lines() {
        let model = PlanModel::new();
        model.add_segment(SegmentKind::Line, v(0, 0), v(5, 0), 0);
        model.add_segment(SegmentKind::Line, v(0, 0), v(0, 5), 0);
        model.add_segment(SegmentKind::Line, v(0, 0), v(5, 5), 0);
        model.add_segment(SegmentKind::Line, v(50, 50), v(60, 50), 0);

        let hits = model.entities_in_rect(&Bounds::new(2, -1, 2, 7));
        assert_eq!(hits.len(), 2);

        let hits = model.entities_in_rect(&Bounds::new(-1, -1, 7, 7));
        assert_eq!(hits.len(), 3);
        let selected = model.segments().iter().filter(|s| s.selected).count();
        assert_eq!(selected, 3);
        assert!(!model.segments()[3].selected);
    }

    #[test]
    fn test_entities_in_rect_fixtures_and_labels() {
        let model = PlanModel::new();
        model.add_window(v(0, 0), true, 0);
        model.add_door(v(4, 2), true, 4, 0);
        model.add_label("Far", v(500, 500), 0);

        let hits = model.entities_in_rect(&Bounds::new(0, 0, 5, 5));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(Entity::is_selected));
        assert!(hits.iter().any(|e| matches!(e, Entity::Fixture(f) if f.kind == FixtureKind::Door)));
        assert!(!model.labels()[0].selected);

        let hits = model.entities_in_rect(&Bounds::new(490, 490, 20, 20));
        assert_eq!(hits.len(), 1);
        assert!(model.labels()[0].selected);
        assert!(!model.windows()[0].selected);
    }
}
