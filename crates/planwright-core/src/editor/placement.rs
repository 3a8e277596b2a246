//! Two-point, one-point and label placement.

use super::{Editor, EditorError};
use crate::entities::{Entity, EntityTrait, Fixture, FixtureKind, SegmentKind, WallHit, WallLocator};
use crate::geometry::{self, Vertex};
use crate::history::Action;
use crate::input::{InputEvent, KeyState};
use crate::snap::{self, AxisLock, SnapResult, SnapSettings};
use crate::tools::ToolState;
use crate::units::format_feet_inches;
use kurbo::Point;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Largest length accepted from typed digits, in model units.
pub const MAX_TYPED_LENGTH: u64 = 1_000_000;

impl Editor {
    fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            interval: self.config.snap_interval,
            vertex_range: self.config.vertex_snap_range,
        }
    }

    /// Snap a model-space pointer position against the current plan.
    pub(super) fn adjusted_pointer(&self, world: Point, placing: Option<AxisLock>) -> SnapResult {
        snap::snap_pointer(&self.model, world, placing, self.snap_settings())
    }

    /// Typed digits as a length, when non-zero and at most `MAX_TYPED_LENGTH`.
    fn typed_length(&self) -> Option<f64> {
        self.typed
            .parse::<u64>()
            .ok()
            .filter(|&len| len > 0 && len <= MAX_TYPED_LENGTH)
            .map(|len| len as f64)
    }

    /// Digits were typed but do not fit `MAX_TYPED_LENGTH`.
    fn typed_length_too_large(&self) -> bool {
        !self.typed.is_empty()
            && self
                .typed
                .parse::<u64>()
                .map_or(true, |len| len > MAX_TYPED_LENGTH)
    }

    /// Project the second point from the snapped pointer.
    fn second_point(&self, first: Vertex, pointer: Vertex, lock: AxisLock) -> Vertex {
        let candidate = lock.constrain(first, pointer);
        let Some(length) = self.typed_length() else {
            return candidate;
        };

        let dx = (candidate.x - first.x) as f64;
        let dy = (candidate.y - first.y) as f64;
        let norm = dx.hypot(dy);
        let (ux, uy) = if norm == 0.0 { (1.0, 0.0) } else { (dx / norm, dy / norm) };
        Vertex::round(Point::new(
            first.x as f64 + ux * length,
            first.y as f64 + uy * length,
        ))
    }

    pub(super) fn handle_first_point(&mut self, kind: SegmentKind, event: &InputEvent, world: Point) {
        let snapped = self.adjusted_pointer(world, Some(AxisLock::Free));
        self.snap = Some(snapped);
        if event.is_commit() {
            log::debug!("First point of {} at {:?}", kind.name(), snapped.point);
            self.tool = ToolState::PlacingSecondPoint {
                kind,
                first: snapped.point,
                end: snapped.point,
                lock: AxisLock::Free,
            };
        }
    }

    pub(super) fn handle_second_point(
        &mut self,
        keys: &KeyState,
        event: &InputEvent,
        world: Point,
        now: Instant,
    ) {
        let ToolState::PlacingSecondPoint {
            kind, first, lock, ..
        } = self.tool
        else {
            return;
        };

        if self.typed_length_too_large() {
            self.typed.clear();
            self.messages.push(
                format!("Typed length exceeds {} units.", MAX_TYPED_LENGTH),
                now,
            );
        }

        let snapped = self.adjusted_pointer(world, Some(lock));
        self.snap = Some(snapped);
        let lock = if keys.shift() {
            AxisLock::from_points(first, snapped.point)
        } else {
            AxisLock::Free
        };
        let end = self.second_point(first, snapped.point, lock);
        let length = geometry::distance(first.to_point(), end.to_point());
        self.lines.info = format!("Length: {}", format_feet_inches(length));

        if event.is_commit() && end != first {
            self.commit_segment(kind, first, end, length, now);
        } else {
            self.tool = ToolState::PlacingSecondPoint {
                kind,
                first,
                end,
                lock,
            };
        }
    }

    fn commit_segment(&mut self, kind: SegmentKind, first: Vertex, end: Vertex, length: f64, now: Instant) {
        if kind == SegmentKind::Measurement {
            self.messages
                .push(format!("Measurement: {}", format_feet_inches(length)), now);
        } else {
            let segment = self.model.add_segment(kind, first, end, self.layer);
            log::debug!("Placed {:?} from {:?} to {:?}", kind, first, end);
            self.history.record(Action::Add(Entity::Segment(segment)));
        }
        self.reset();
    }

    pub(super) fn handle_one_point(
        &mut self,
        kind: FixtureKind,
        event: &InputEvent,
        world: Point,
        now: Instant,
    ) {
        let position = self.adjusted_pointer(world, None).point;
        let preview = self
            .model
            .nearest_wall(position, kind == FixtureKind::Window)
            .map(|hit| fixture_on_wall(kind, &hit));

        if !event.is_commit() {
            self.tool = ToolState::PlacingOnePoint { kind, preview };
            return;
        }

        match preview {
            Some(mut fixture) => {
                fixture.layer = self.layer;
                self.model.insert(Entity::Fixture(fixture.clone()));
                log::debug!("Placed {}", fixture.describe());
                self.history.record(Action::Add(Entity::Fixture(fixture)));
            }
            None => {
                let text = match kind {
                    FixtureKind::Window => "No exterior wall for window placement at that location.",
                    FixtureKind::Door => "No wall for door placement at that location.",
                };
                self.messages.push(text, now);
            }
        }
        self.reset();
    }

    /// Place the typed text as a label at the adjusted pointer.
    pub(super) fn commit_label(&mut self, world: Point) -> Result<(), EditorError> {
        if self.typed.is_empty() {
            return Ok(());
        }
        if self.tool != ToolState::AddingText {
            return Err(EditorError::InvalidState(
                "labels are only placed by the text tool".to_string(),
            ));
        }
        let position = self.adjusted_pointer(world, None).point;
        let label = self.model.add_label(&self.typed, position, self.layer);
        log::debug!("Placed label {:?} at {:?}", label.text, position);
        self.history.record(Action::Add(Entity::Label(label)));
        self.reset();
        Ok(())
    }
}

fn fixture_on_wall(kind: FixtureKind, hit: &WallHit) -> Fixture {
    let horizontal = hit.wall.is_horizontal();
    match kind {
        FixtureKind::Window => Fixture::window(hit.point, horizontal),
        FixtureKind::Door => Fixture::door(hit.point, horizontal, hit.wall.thickness().width()),
    }
}
